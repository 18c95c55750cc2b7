use std::collections::BTreeMap;

use async_trait::async_trait;
use dsedit_primitives::{ContentStore, MemberListEntry, MemberRef, StoreError, StoreResult};
use parking_lot::RwLock;

#[derive(Debug, Clone)]
struct StoredMember {
	content: String,
	modified: String,
}

impl StoredMember {
	fn new(content: String) -> Self {
		Self {
			content,
			modified: chrono::Local::now().format("%Y-%m-%d").to_string(),
		}
	}
}

/// [`ContentStore`] holding datasets in process.
///
/// Members are listed in name order and stamped with the local date of
/// their last save. Saving into an unknown dataset creates it.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
	datasets: RwLock<BTreeMap<String, BTreeMap<String, StoredMember>>>,
}

impl MemoryContentStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder form of [`insert`](Self::insert).
	pub fn with_member(self, dataset: &str, member: &str, content: &str) -> Self {
		self.insert(dataset, member, content);
		self
	}

	/// Creates an empty dataset if it does not exist yet.
	pub fn add_dataset(&self, dataset: &str) {
		self.datasets.write().entry(dataset.to_string()).or_default();
	}

	/// Stores `content` under `dataset(member)`, replacing any previous content.
	pub fn insert(&self, dataset: &str, member: &str, content: &str) {
		self.datasets
			.write()
			.entry(dataset.to_string())
			.or_default()
			.insert(member.to_string(), StoredMember::new(content.to_string()));
	}

	/// Returns the stored content of a member.
	pub fn content(&self, target: &MemberRef) -> Option<String> {
		let member = target.member()?;
		self.datasets
			.read()
			.get(&target.dataset)
			.and_then(|members| members.get(member))
			.map(|m| m.content.clone())
	}

	/// Returns the member names of `dataset`, or `None` if it does not exist.
	pub fn member_names(&self, dataset: &str) -> Option<Vec<String>> {
		self.datasets.read().get(dataset).map(|members| members.keys().cloned().collect())
	}

	/// Removes a member. Returns false if it did not exist.
	pub fn remove(&self, target: &MemberRef) -> bool {
		let Some(member) = target.member() else {
			return false;
		};
		self.datasets
			.write()
			.get_mut(&target.dataset)
			.is_some_and(|members| members.remove(member).is_some())
	}
}

fn not_found(target: &MemberRef) -> StoreError {
	StoreError::Rejected(format!("member {target} not found"))
}

#[async_trait]
impl ContentStore for MemoryContentStore {
	async fn list(&self, dataset: &str) -> StoreResult<Vec<MemberListEntry>> {
		let datasets = self.datasets.read();
		let members = datasets
			.get(dataset)
			.ok_or_else(|| StoreError::Rejected(format!("dataset {dataset} not found")))?;
		Ok(members
			.iter()
			.map(|(name, m)| MemberListEntry::new(name).modified(&m.modified))
			.collect())
	}

	async fn load(&self, target: &MemberRef) -> StoreResult<String> {
		self.content(target).ok_or_else(|| not_found(target))
	}

	async fn save(&self, target: &MemberRef, content: &str) -> StoreResult<()> {
		let member = target
			.member()
			.ok_or_else(|| StoreError::Rejected(format!("no member selected in {}", target.dataset)))?;
		self.insert(&target.dataset, member, content);
		Ok(())
	}

	async fn delete(&self, target: &MemberRef) -> StoreResult<()> {
		if self.remove(target) { Ok(()) } else { Err(not_found(target)) }
	}
}
