use crm_core::{
    Activity, ActivityId, ActivityType, Contact, ContactId, ContactListQuery, ContactPatch,
    ContactService, ContactSort, ContactSortKey, Deal, DealId, DealService, DealStage,
    EntityStore, Fixtures, LatencyConfig, ManualClock, NewContact, ServiceError, SortOrder,
    ValidationError,
};
use std::sync::Arc;

fn contact(id: u64, name: &str, company: &str, tags: &[&str]) -> Contact {
    Contact {
        id: ContactId(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: String::new(),
        company: company.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        created_at: 100,
        last_activity: 100 + id as i64,
    }
}

fn deal(id: u64, contact_id: u64) -> Deal {
    Deal {
        id: DealId(id),
        contact_id: ContactId(contact_id),
        title: format!("deal {id}"),
        value: 100.0,
        stage: DealStage::Lead,
        created_at: 100,
        updated_at: 100,
    }
}

fn activity(id: u64, contact_id: u64, timestamp: i64) -> Activity {
    Activity {
        id: ActivityId(id),
        contact_id: ContactId(contact_id),
        kind: ActivityType::Note,
        content: format!("note {id}"),
        timestamp,
    }
}

fn store(clock: Arc<ManualClock>) -> Arc<EntityStore> {
    let fixtures = Fixtures {
        contacts: vec![
            contact(1, "Ada Lovelace", "Engines Ltd", &["vip", "enterprise"]),
            contact(2, "Grace Hopper", "Navy", &["technical"]),
            contact(4, "Linus Torvalds", "Kernel Org", &["startup"]),
        ],
        deals: vec![deal(1, 1), deal(2, 2), deal(3, 1)],
        activities: vec![
            activity(1, 1, 10),
            activity(2, 2, 20),
            activity(3, 1, 30),
        ],
    };
    Arc::new(EntityStore::from_fixtures(fixtures, clock).unwrap())
}

fn service(clock: Arc<ManualClock>) -> (ContactService, DealService, Arc<EntityStore>) {
    let store = store(clock);
    (
        ContactService::new(Arc::clone(&store), LatencyConfig::immediate()),
        DealService::new(Arc::clone(&store), LatencyConfig::immediate()),
        store,
    )
}

#[tokio::test]
async fn create_then_get_roundtrip_assigns_id_and_timestamps() {
    let clock = Arc::new(ManualClock::new(5_000));
    let (contacts, _, _) = service(clock);

    let created = contacts
        .create(
            NewContact::new("A", "a@x.com")
                .company("X")
                .tags(["vip"]),
        )
        .await
        .unwrap();
    assert_eq!(created.id, ContactId(5));

    let loaded = contacts.get_by_id(created.id).await.unwrap();
    assert_eq!(loaded.name, "A");
    assert_eq!(loaded.email, "a@x.com");
    assert_eq!(loaded.company, "X");
    assert_eq!(loaded.tags, vec!["vip".to_string()]);
    assert_eq!(loaded.created_at, 5_000);
    assert_eq!(loaded.last_activity, 5_000);
}

#[tokio::test]
async fn create_on_empty_store_starts_at_one() {
    let store = Arc::new(EntityStore::with_clock(Arc::new(ManualClock::new(0))));
    let contacts = ContactService::new(store, LatencyConfig::immediate());

    let first = contacts
        .create(NewContact::new("First", "first@example.com"))
        .await
        .unwrap();
    let second = contacts
        .create(NewContact::new("Second", "second@example.com"))
        .await
        .unwrap();
    assert_eq!(first.id, ContactId(1));
    assert_eq!(second.id, ContactId(2));
}

#[tokio::test]
async fn get_by_id_of_missing_contact_is_none() {
    let (contacts, _, _) = service(Arc::new(ManualClock::new(0)));
    assert!(contacts.get_by_id(ContactId(3)).await.is_none());
}

#[tokio::test]
async fn invalid_create_performs_no_mutation() {
    let (contacts, _, store) = service(Arc::new(ManualClock::new(0)));
    let before = store.counts().await;

    let err = contacts
        .create(NewContact::new("Nobody", "not-an-email"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Invalid(ValidationError::InvalidEmail(_))
    ));
    let err = contacts
        .create(NewContact::new("   ", "blank@example.com"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Invalid(ValidationError::BlankField("name"))
    );
    assert_eq!(store.counts().await, before);
}

#[tokio::test]
async fn update_merges_patch_and_refreshes_last_activity() {
    let clock = Arc::new(ManualClock::new(1_000));
    let (contacts, _, _) = service(Arc::clone(&clock));
    clock.advance(250);

    let patch = ContactPatch {
        phone: Some("+1 555 0100".to_string()),
        tags: Some(vec!["vip".to_string(), " vip ".to_string(), "board".to_string()]),
        ..ContactPatch::default()
    };
    let updated = contacts.update(ContactId(1), &patch).await.unwrap();
    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(updated.company, "Engines Ltd");
    assert_eq!(updated.phone, "+1 555 0100");
    assert_eq!(updated.tags, vec!["vip".to_string(), "board".to_string()]);
    assert_eq!(updated.created_at, 100);
    assert_eq!(updated.last_activity, 1_250);
}

#[tokio::test]
async fn update_missing_contact_fails_and_leaves_collection_unchanged() {
    let (contacts, _, _) = service(Arc::new(ManualClock::new(0)));
    let before = contacts.get_all().await;

    let patch = ContactPatch {
        name: Some("Ghost".to_string()),
        ..ContactPatch::default()
    };
    let err = contacts.update(ContactId(3), &patch).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::NotFound {
            entity: "contact",
            id: 3
        }
    );
    assert_eq!(contacts.get_all().await, before);
}

#[tokio::test]
async fn delete_cascades_to_deals_and_activities() {
    let (contacts, deals, store) = service(Arc::new(ManualClock::new(0)));

    let deletion = contacts.delete(ContactId(1)).await.unwrap();
    assert_eq!(deletion.deals_removed, 2);
    assert_eq!(deletion.activities_removed, 2);

    assert!(contacts.get_by_id(ContactId(1)).await.is_none());
    let remaining = deals.get_all().await;
    assert_eq!(remaining.len(), 1);
    assert!(remaining
        .iter()
        .all(|view| view.deal.contact_id != ContactId(1)));
    let counts = store.counts().await;
    assert_eq!(counts.contacts, 2);
    assert_eq!(counts.activities, 1);
}

#[tokio::test]
async fn delete_missing_contact_removes_nothing() {
    let (contacts, _, store) = service(Arc::new(ManualClock::new(0)));
    let before = store.counts().await;

    let err = contacts.delete(ContactId(42)).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { id: 42, .. }));
    assert_eq!(store.counts().await, before);
}

#[tokio::test]
async fn detail_joins_deals_and_newest_first_activities() {
    let (contacts, _, _) = service(Arc::new(ManualClock::new(0)));

    let detail = contacts.get_detail(ContactId(1)).await.unwrap();
    assert_eq!(detail.contact.name, "Ada Lovelace");
    let deal_ids: Vec<DealId> = detail.deals.iter().map(|deal| deal.id).collect();
    assert_eq!(deal_ids, vec![DealId(1), DealId(3)]);
    let activity_ids: Vec<ActivityId> = detail.activities.iter().map(|a| a.id).collect();
    assert_eq!(activity_ids, vec![ActivityId(3), ActivityId(1)]);

    assert!(contacts.get_detail(ContactId(9)).await.is_none());
}

#[tokio::test]
async fn search_and_tag_filter_are_pure_queries() {
    let (contacts, _, _) = service(Arc::new(ManualClock::new(0)));

    let hits = contacts.search("ENGINES").await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, ContactId(1));
    assert_eq!(contacts.search("").await.len(), 3);

    let tagged = contacts.filter_by_tags(&["technical", "startup"]).await;
    let ids: Vec<ContactId> = tagged.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![ContactId(2), ContactId(4)]);
    assert_eq!(contacts.filter_by_tags::<&str>(&[]).await.len(), 3);

    assert_eq!(contacts.get_all().await.len(), 3);
}

#[tokio::test]
async fn list_sorts_directory_by_last_activity_desc() {
    let (contacts, _, _) = service(Arc::new(ManualClock::new(0)));

    let query = ContactListQuery {
        sort: Some(ContactSort::new(
            ContactSortKey::LastActivity,
            SortOrder::Desc,
        )),
        ..ContactListQuery::default()
    };
    let listed = contacts.list(&query).await;
    let ids: Vec<ContactId> = listed.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![ContactId(4), ContactId(2), ContactId(1)]);
}

#[tokio::test]
async fn returned_records_are_copies() {
    let (contacts, _, _) = service(Arc::new(ManualClock::new(0)));

    let mut copy = contacts.get_by_id(ContactId(1)).await.unwrap();
    copy.name = "Mutated".to_string();
    copy.tags.clear();

    let fresh = contacts.get_by_id(ContactId(1)).await.unwrap();
    assert_eq!(fresh.name, "Ada Lovelace");
    assert_eq!(fresh.tags.len(), 2);
}

#[tokio::test]
async fn update_with_invalid_email_changes_nothing() {
    let clock = Arc::new(ManualClock::new(0));
    let (contacts, _, _) = service(Arc::clone(&clock));
    let before = contacts.get_all().await;
    clock.advance(1_000);

    let patch = ContactPatch {
        email: Some("bad".to_string()),
        name: Some("Renamed".to_string()),
        ..ContactPatch::default()
    };
    let err = contacts.update(ContactId(1), &patch).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Invalid(ValidationError::InvalidEmail("bad".to_string()))
    );
    assert_eq!(contacts.get_all().await, before);
}

#[tokio::test]
async fn create_fails_cleanly_once_ids_are_used_up() {
    let fixtures = Fixtures {
        contacts: vec![contact(u64::MAX, "Last Id", "Edge Co", &[])],
        ..Fixtures::default()
    };
    let clock = Arc::new(ManualClock::new(0));
    let store = Arc::new(EntityStore::from_fixtures(fixtures, clock).unwrap());
    let contacts = ContactService::new(Arc::clone(&store), LatencyConfig::immediate());

    let err = contacts
        .create(NewContact::new("B", "b@x.com"))
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::IdsExhausted { entity: "contact" });
    assert_eq!(store.counts().await.contacts, 1);
}
