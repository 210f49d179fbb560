//! The event store: an ordered list of events kept in sync with storage.

use chrono::NaiveDate;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::{EventDeskError, EventDeskResult};
use crate::event::{Event, EventInput};
use crate::storage::KeyValueStorage;
use crate::validation::{validate_event, validate_input};

/// Key the event list is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "events";

/// Key an unreadable event list is copied to before the store starts empty.
pub fn backup_key(key: &str) -> String {
    format!("{key}.bak")
}

/// What `EventStore::initialize` found in storage.
#[derive(Debug)]
pub enum LoadStatus {
    /// Nothing stored yet.
    Empty,
    /// This many events were loaded.
    Loaded(usize),
    /// Stored data could not be read or parsed. The store started empty;
    /// whatever raw data was readable was copied under `backup_key`.
    Recovered(EventDeskError),
}

/// Read and parse the event list under `key`.
///
/// `Ok(None)` means nothing is stored there.
pub fn load_events<S: KeyValueStorage>(storage: &S, key: &str) -> EventDeskResult<Option<Vec<Event>>> {
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };

    let events: Vec<Event> =
        serde_json::from_str(&raw).map_err(|e| EventDeskError::Load(e.to_string()))?;

    Ok(Some(events))
}

/// Copy the raw value under `key` aside so the next write cannot destroy it.
fn keep_unreadable<S: KeyValueStorage>(storage: &S, key: &str) {
    let Ok(Some(raw)) = storage.get(key) else {
        return;
    };

    let backup = backup_key(key);
    match storage.set(&backup, &raw) {
        Ok(()) => warn!(key, backup = %backup, "unreadable events kept"),
        Err(e) => error!(key, error = %e, "could not keep unreadable events"),
    }
}

pub struct EventStore<S> {
    storage: S,
    key: String,
    events: Vec<Event>,
    persist_error: Option<EventDeskError>,
}

impl<S: KeyValueStorage> EventStore<S> {
    /// Load the store from the default key.
    ///
    /// Never fails: unreadable data leaves the store empty and is reported
    /// through `LoadStatus::Recovered`.
    pub fn initialize(storage: S) -> (Self, LoadStatus) {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: &str) -> (Self, LoadStatus) {
        let (events, status) = match load_events(&storage, key) {
            Ok(None) => (Vec::new(), LoadStatus::Empty),
            Ok(Some(events)) => {
                let count = events.len();
                (events, LoadStatus::Loaded(count))
            }
            Err(e) => {
                warn!(key, error = %e, "stored events unreadable, starting empty");
                keep_unreadable(&storage, key);
                (Vec::new(), LoadStatus::Recovered(e))
            }
        };

        let store = EventStore {
            storage,
            key: key.to_string(),
            events,
            persist_error: None,
        };

        (store, status)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Validate `input`, give it a fresh id and append it.
    pub fn add(&mut self, input: EventInput, today: NaiveDate) -> EventDeskResult<Event> {
        let errors = validate_input(&input, today);
        if !errors.is_empty() {
            return Err(EventDeskError::Validation(errors));
        }

        let event = input.into_event(self.next_id())?;
        self.events.push(event.clone());
        debug!(id = %event.id, name = %event.name, "event added");

        self.persist();
        Ok(event)
    }

    /// Replace the stored event with the same id, keeping its position.
    ///
    /// Returns `Ok(None)` without touching the store or storage if no event
    /// has that id.
    pub fn update(&mut self, event: Event, today: NaiveDate) -> EventDeskResult<Option<Event>> {
        let errors = validate_event(&event, today);
        if !errors.is_empty() {
            return Err(EventDeskError::Validation(errors));
        }

        let Some(slot) = self.events.iter_mut().find(|e| e.id == event.id) else {
            debug!(id = %event.id, "update skipped, no such event");
            return Ok(None);
        };
        *slot = event.clone();
        debug!(id = %event.id, "event updated");

        self.persist();
        Ok(Some(event))
    }

    /// Remove the event with `id`, if any. Storage is rewritten either way.
    pub fn delete(&mut self, id: &str) -> Option<Event> {
        let removed = self
            .events
            .iter()
            .position(|e| e.id == id)
            .map(|index| self.events.remove(index));

        match &removed {
            Some(event) => debug!(id, name = %event.name, "event deleted"),
            None => debug!(id, "delete matched no event"),
        }

        self.persist();
        removed
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// The failure from the most recent write, if it failed.
    pub fn persist_error(&self) -> Option<&EventDeskError> {
        self.persist_error.as_ref()
    }

    pub fn take_persist_error(&mut self) -> Option<EventDeskError> {
        self.persist_error.take()
    }

    /// Whether the last write reached storage.
    pub fn is_synced(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Write the whole list. A failure is logged and kept for the caller;
    /// the in-memory list stays as it is.
    fn persist(&mut self) {
        self.persist_error = match self.write() {
            Ok(()) => None,
            Err(e) => {
                error!(key = %self.key, error = %e, "could not save events");
                Some(e)
            }
        };
    }

    fn write(&self) -> EventDeskResult<()> {
        let json = serde_json::to_string(&self.events)
            .map_err(|e| EventDeskError::Serialization(e.to_string()))?;

        self.storage
            .set(&self.key, &json)
            .map_err(|e| match e {
                EventDeskError::Persistence(_) => e,
                other => EventDeskError::Persistence(other.to_string()),
            })
    }

    fn next_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use crate::storage::{FileStorage, MemoryStorage};
    use crate::validation::Field;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::HashSet;

    /// Storage that accepts reads but rejects every write.
    struct FullStorage(MemoryStorage);

    impl KeyValueStorage for FullStorage {
        fn get(&self, key: &str) -> EventDeskResult<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> EventDeskResult<()> {
            Err(EventDeskError::Persistence("quota exceeded".into()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
    }

    fn day(offset: i64) -> DateTime<Utc> {
        Utc.from_utc_datetime(&(today() + Duration::days(offset)).and_hms_opt(0, 0, 0).unwrap())
    }

    fn input(name: &str) -> EventInput {
        EventInput {
            name: name.to_string(),
            event_type: Some(EventType::General),
            start_date: Some(day(0)),
            end_date: Some(day(2)),
            description: "x".to_string(),
            handled_by: "Ann Lee".to_string(),
            organisation: "City Hall".to_string(),
            sub_events: Some(2),
        }
    }

    fn reload(storage: &MemoryStorage) -> Vec<Event> {
        let (store, _) = EventStore::initialize(storage.clone());
        store.events().to_vec()
    }

    #[test]
    fn test_add_fair_then_reload() {
        let storage = MemoryStorage::new();
        let (mut store, status) = EventStore::initialize(storage.clone());
        assert!(matches!(status, LoadStatus::Empty));

        let added = store.add(input("Fair"), today()).unwrap();

        assert_eq!(store.len(), 1);
        assert!(Uuid::parse_str(&added.id).is_ok());
        assert_eq!(added.name, "Fair");
        assert_eq!(added.event_type, EventType::General);
        assert_eq!(added.start_date, Some(day(0)));
        assert_eq!(added.end_date, Some(day(2)));
        assert_eq!(added.handled_by, "Ann Lee");
        assert_eq!(added.organisation, "City Hall");
        assert_eq!(added.sub_events, 2);

        assert_eq!(reload(&storage), vec![added]);
    }

    #[test]
    fn test_added_ids_are_unique_and_order_is_kept() {
        let (mut store, _) = EventStore::initialize(MemoryStorage::new());

        let names = ["Fair", "Gala", "Race", "Fete", "Show"];
        for name in names {
            store.add(input(name), today()).unwrap();
        }

        let ids: HashSet<_> = store.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), names.len());

        let stored: Vec<_> = store.events().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(stored, names);
    }

    #[test]
    fn test_add_rejects_invalid_input_without_change() {
        let storage = MemoryStorage::new();
        let (mut store, _) = EventStore::initialize(storage.clone());

        let mut bad = input("ab");
        bad.start_date = Some(day(-1));

        let Err(EventDeskError::Validation(errors)) = store.add(bad, today()) else {
            panic!("expected a validation error");
        };
        assert!(errors.contains(Field::Name));
        assert!(errors.contains(Field::StartDate));
        assert!(store.is_empty());
        assert_eq!(storage.get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let storage = MemoryStorage::new();
        let (mut store, _) = EventStore::initialize(storage.clone());
        store.add(input("Fair"), today()).unwrap();
        let second = store.add(input("Gala"), today()).unwrap();
        store.add(input("Race"), today()).unwrap();

        let mut edited = second.clone();
        edited.name = "Grand Gala".to_string();
        edited.sub_events = 5;

        let updated = store.update(edited.clone(), today()).unwrap();

        assert_eq!(updated, Some(edited.clone()));
        assert_eq!(store.events()[1], edited);
        assert_eq!(reload(&storage), store.events());
    }

    #[test]
    fn test_update_unknown_id_leaves_store_unchanged() {
        let storage = MemoryStorage::new();
        let (mut store, _) = EventStore::initialize(storage.clone());
        store.add(input("Fair"), today()).unwrap();
        let before = store.events().to_vec();

        let mut stranger = before[0].clone();
        stranger.id = "missing".to_string();
        stranger.name = "Other".to_string();

        assert_eq!(store.update(stranger, today()).unwrap(), None);
        assert_eq!(store.events(), before.as_slice());
        assert_eq!(reload(&storage), before);
    }

    #[test]
    fn test_update_validates_before_lookup() {
        let (mut store, _) = EventStore::initialize(MemoryStorage::new());
        let added = store.add(input("Fair"), today()).unwrap();

        let mut edited = added.clone();
        edited.end_date = Some(day(-3));

        assert!(matches!(
            store.update(edited, today()),
            Err(EventDeskError::Validation(_))
        ));
        assert_eq!(store.events(), [added].as_slice());
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let storage = MemoryStorage::new();
        let (mut store, _) = EventStore::initialize(storage.clone());
        let first = store.add(input("Fair"), today()).unwrap();
        let second = store.add(input("Gala"), today()).unwrap();
        let third = store.add(input("Race"), today()).unwrap();

        let removed = store.delete(&second.id);

        assert_eq!(removed, Some(second));
        assert_eq!(store.events(), [first.clone(), third.clone()].as_slice());
        assert_eq!(reload(&storage), vec![first, third]);
    }

    #[test]
    fn test_delete_unknown_id_still_persists() {
        let storage = MemoryStorage::new();
        let (mut store, _) = EventStore::initialize(storage.clone());

        assert_eq!(store.delete("missing"), None);

        assert!(store.is_empty());
        assert_eq!(storage.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_reload_matches_after_mixed_operations() {
        let storage = MemoryStorage::new();
        let (mut store, _) = EventStore::initialize(storage.clone());

        let a = store.add(input("Fair"), today()).unwrap();
        let b = store.add(input("Gala"), today()).unwrap();
        let mut a2 = a.clone();
        a2.description = "moved indoors".to_string();
        a2.end_date = Some(day(4));
        store.update(a2, today()).unwrap();
        store.delete(&b.id);
        store.add(input("Race"), today()).unwrap();

        let (reloaded, status) = EventStore::initialize(storage.clone());
        assert!(matches!(status, LoadStatus::Loaded(2)));
        assert_eq!(reloaded.events(), store.events());
    }

    #[test]
    fn test_malformed_data_recovers_empty() {
        let storage = MemoryStorage::new();
        storage.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();

        let (store, status) = EventStore::initialize(storage);

        assert!(store.is_empty());
        assert!(matches!(status, LoadStatus::Recovered(EventDeskError::Load(_))));
    }

    #[test]
    fn test_unreadable_data_survives_next_write() {
        let storage = MemoryStorage::new();
        let raw = r#"[{"id":"a","name":"Fair","type":"General","subEvents":"2.5"}]"#;
        storage.set(DEFAULT_STORAGE_KEY, raw).unwrap();

        let (mut store, status) = EventStore::initialize(storage.clone());
        assert!(matches!(status, LoadStatus::Recovered(_)));
        store.add(input("Gala"), today()).unwrap();

        assert_eq!(
            storage.get(&backup_key(DEFAULT_STORAGE_KEY)).unwrap().as_deref(),
            Some(raw)
        );
        assert_eq!(reload(&storage).len(), 1);
    }

    #[test]
    fn test_loads_data_written_by_browser_app() {
        let storage = MemoryStorage::new();
        storage
            .set(
                DEFAULT_STORAGE_KEY,
                r#"[{"id":"1b9d6bcd-bbfd-4b2d-9b5d-ab8dfbbd4bed","name":"Fair","type":"General",
                    "startDate":"2030-06-15T00:00:00.000Z","endDate":"2030-06-17T00:00:00.000Z",
                    "description":"x","handledBy":"Ann Lee","organisation":"City Hall","subEvents":"2"}]"#,
            )
            .unwrap();

        let (store, status) = EventStore::initialize(storage);

        assert!(matches!(status, LoadStatus::Loaded(1)));
        let event = store.get("1b9d6bcd-bbfd-4b2d-9b5d-ab8dfbbd4bed").unwrap();
        assert_eq!(event.start_date, Some(day(0)));
        assert_eq!(event.sub_events, 2);
    }

    #[test]
    fn test_write_failure_is_recorded_not_rolled_back() {
        let (mut store, _) = EventStore::initialize(FullStorage(MemoryStorage::new()));

        let added = store.add(input("Fair"), today()).unwrap();

        assert_eq!(store.events(), [added].as_slice());
        assert!(!store.is_synced());
        assert!(matches!(
            store.take_persist_error(),
            Some(EventDeskError::Persistence(_))
        ));
        assert!(store.is_synced());
    }

    #[test]
    fn test_custom_key_on_file_storage() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path());

        let (mut store, _) = EventStore::with_key(storage.clone(), "festival");
        let added = store.add(input("Fair"), today()).unwrap();

        assert!(tmp.path().join("festival.json").exists());
        let (reloaded, _) = EventStore::with_key(storage, "festival");
        assert_eq!(reloaded.events(), [added].as_slice());
    }
}
