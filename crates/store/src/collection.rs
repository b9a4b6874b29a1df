use crate::entities::{Changes, Draft, Record};
use crate::error::StoreError;

/// Ordered records of one kind, with monotonic id assignment.
///
/// Ids come from a counter owned by the collection rather than from the
/// records currently present, so an id freed by a removal is never handed out
/// again.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    records: Vec<T>,
    next_id: i64,
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Build a collection from existing records; the counter resumes after
    /// the highest id among them.
    pub fn seeded(records: Vec<T>) -> Self {
        let next_id = records.iter().map(T::id).max().map_or(1, |max| max + 1);
        Self { records, next_id }
    }

    /// Id the next inserted record will receive.
    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order.
    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn find_mut(&mut self, id: i64) -> Option<&mut T> {
        self.records.iter_mut().find(|record| record.id() == id)
    }

    /// Like [`find`](Self::find) but reports a miss as [`StoreError::NotFound`].
    pub fn get(&self, id: i64) -> Result<&T, StoreError> {
        self.find(id).ok_or(StoreError::NotFound(T::KIND))
    }

    pub fn get_mut(&mut self, id: i64) -> Result<&mut T, StoreError> {
        self.find_mut(id).ok_or(StoreError::NotFound(T::KIND))
    }

    /// Assign the next id, build the record with it and append it.
    pub fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(build(id));
        tracing::debug!(kind = %T::KIND, id, "record inserted");
        &self.records[self.records.len() - 1]
    }

    /// Store a validated draft under the next id.
    pub fn insert<D: Draft<Record = T>>(&mut self, draft: D) -> &T {
        self.insert_with(|id| draft.into_record(id))
    }

    /// Overlay `changes` onto the record with the given id.
    pub fn update<C: Changes<T>>(&mut self, id: i64, changes: C) -> Result<&T, StoreError> {
        let record = self.get_mut(id)?;
        changes.apply_to(record);
        tracing::debug!(kind = %T::KIND, id, "record updated");
        Ok(&*record)
    }

    /// Remove and return the record with the given id.
    pub fn remove(&mut self, id: i64) -> Result<T, StoreError> {
        let index = self
            .records
            .iter()
            .position(|record| record.id() == id)
            .ok_or(StoreError::NotFound(T::KIND))?;
        tracing::debug!(kind = %T::KIND, id, "record removed");
        Ok(self.records.remove(index))
    }

    /// Records matching `predicate`, in insertion order.
    pub fn filter<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a T> + 'a
    where
        P: Fn(&T) -> bool + 'a,
    {
        self.records.iter().filter(move |record| predicate(*record))
    }
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NewUser, User, UserChanges};
    use crate::RecordKind;

    fn user(id: i64, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    fn insert(users: &mut Collection<User>, name: &str) -> i64 {
        users.insert_with(|id| user(id, name)).id
    }

    #[test]
    fn empty_collection_starts_at_one() {
        let mut users = Collection::<User>::new();
        assert_eq!(users.next_id(), 1);
        assert_eq!(insert(&mut users, "Alice"), 1);
        assert_eq!(insert(&mut users, "Bob"), 2);
    }

    #[test]
    fn drafts_receive_the_next_id() {
        let mut users = Collection::seeded(vec![user(2, "Bob")]);
        let stored = users.insert(NewUser {
            name: "Carol".to_string(),
            email: "carol@example.com".to_string(),
        });

        assert_eq!(stored.id, 3);
        assert_eq!(stored.name, "Carol");
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn seeded_collection_resumes_after_max_id() {
        let users = Collection::seeded(vec![user(4, "Alice"), user(2, "Bob")]);
        assert_eq!(users.next_id(), 5);

        let empty = Collection::<User>::seeded(Vec::new());
        assert_eq!(empty.next_id(), 1);
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut users = Collection::new();
        insert(&mut users, "Alice");
        let bob = insert(&mut users, "Bob");

        users.remove(bob).unwrap();
        assert_eq!(insert(&mut users, "Carol"), 3);

        users.remove(1).unwrap();
        users.remove(3).unwrap();
        assert!(users.is_empty());
        assert_eq!(insert(&mut users, "Dave"), 4);
    }

    #[test]
    fn lookups_report_missing_records() {
        let mut users = Collection::seeded(vec![user(1, "Alice")]);

        assert!(users.find(1).is_some());
        assert!(users.find(9).is_none());
        assert_eq!(users.get(9), Err(StoreError::NotFound(RecordKind::User)));
        assert_eq!(
            users.remove(9).unwrap_err(),
            StoreError::NotFound(RecordKind::User)
        );
        assert_eq!(
            users.update(9, UserChanges::default()).unwrap_err(),
            StoreError::NotFound(RecordKind::User)
        );
    }

    #[test]
    fn update_merges_only_present_fields() {
        let mut users = Collection::seeded(vec![user(1, "Alice")]);
        let changes = UserChanges {
            name: Some("Alicia".to_string()),
            email: None,
        };

        let updated = users.update(1, changes).unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.email, "alice@example.com");
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut users = Collection::seeded(vec![user(7, "Zed"), user(3, "Amy")]);
        insert(&mut users, "Bo");

        let ids: Vec<i64> = users.all().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![7, 3, 8]);

        let short: Vec<i64> = users.filter(|u| u.name.len() <= 2).map(|u| u.id).collect();
        assert_eq!(short, vec![8]);
    }
}
