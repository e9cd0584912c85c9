use crm_core::{
    Activity, ActivityId, ActivityPatch, ActivityService, ActivityType, Contact, ContactId,
    EntityStore, Fixtures, LatencyConfig, ManualClock, NewActivity, ServiceError,
    ValidationError,
};
use std::sync::Arc;

fn activity(id: u64, contact_id: u64, kind: ActivityType, timestamp: i64) -> Activity {
    Activity {
        id: ActivityId(id),
        contact_id: ContactId(contact_id),
        kind,
        content: format!("activity {id}"),
        timestamp,
    }
}

fn activity_service(clock: Arc<ManualClock>) -> ActivityService {
    let fixtures = Fixtures {
        contacts: vec![Contact {
            id: ContactId(1),
            name: "Michael Chen".to_string(),
            email: "m.chen@innovatetech.io".to_string(),
            phone: String::new(),
            company: "InnovateTech".to_string(),
            tags: Vec::new(),
            created_at: 0,
            last_activity: 0,
        }],
        deals: Vec::new(),
        activities: vec![
            activity(1, 1, ActivityType::Call, 300),
            activity(2, 2, ActivityType::Email, 100),
            activity(3, 1, ActivityType::Call, 200),
            activity(4, 1, ActivityType::Meeting, 400),
        ],
    };
    let store = Arc::new(EntityStore::from_fixtures(fixtures, clock).unwrap());
    ActivityService::new(store, LatencyConfig::immediate())
}

fn ids(views: &[crm_core::ActivityView]) -> Vec<u64> {
    views.iter().map(|view| view.activity.id.get()).collect()
}

#[tokio::test]
async fn feed_is_newest_first_with_contact_fields() {
    let activities = activity_service(Arc::new(ManualClock::new(0)));

    let feed = activities.get_all().await;
    assert_eq!(ids(&feed), vec![4, 1, 3, 2]);
    assert_eq!(feed[0].contact_name, "Michael Chen");
    assert_eq!(feed[3].contact_name, "Unknown Contact");
}

#[tokio::test]
async fn filters_by_contact_and_type_keep_feed_order() {
    let activities = activity_service(Arc::new(ManualClock::new(0)));

    assert_eq!(
        ids(&activities.get_by_contact_id(ContactId(1)).await),
        vec![4, 1, 3]
    );
    assert_eq!(
        ids(&activities.get_by_type(ActivityType::Call).await),
        vec![1, 3]
    );
    assert!(activities.get_by_type(ActivityType::Note).await.is_empty());
}

#[tokio::test]
async fn create_defaults_type_and_timestamp() {
    let activities = activity_service(Arc::new(ManualClock::new(7_777)));

    let input = NewActivity {
        contact_id: ContactId(1),
        kind: None,
        content: "Followed up on pricing".to_string(),
        timestamp: None,
    };
    let created = activities.create(input).await.unwrap();
    assert_eq!(created.activity.id, ActivityId(5));
    assert_eq!(created.activity.kind, ActivityType::Note);
    assert_eq!(created.activity.timestamp, 7_777);
    assert_eq!(created.contact_company, "InnovateTech");

    let feed = activities.get_all().await;
    assert_eq!(feed[0].activity.id, ActivityId(5));
}

#[tokio::test]
async fn create_rejects_blank_content() {
    let activities = activity_service(Arc::new(ManualClock::new(0)));

    let err = activities
        .create(NewActivity::new(ContactId(1), ActivityType::Call, "  "))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Invalid(ValidationError::BlankField("content"))
    );
    assert_eq!(activities.get_all().await.len(), 4);
}

#[tokio::test]
async fn update_merges_without_touching_timestamp() {
    let clock = Arc::new(ManualClock::new(0));
    let activities = activity_service(Arc::clone(&clock));
    clock.advance(10_000);

    let patch = ActivityPatch {
        kind: Some(ActivityType::Meeting),
        ..ActivityPatch::default()
    };
    let updated = activities.update(ActivityId(2), &patch).await.unwrap();
    assert_eq!(updated.activity.kind, ActivityType::Meeting);
    assert_eq!(updated.activity.content, "activity 2");
    assert_eq!(updated.activity.timestamp, 100);
}

#[tokio::test]
async fn missing_activity_reads_none_and_writes_fail() {
    let activities = activity_service(Arc::new(ManualClock::new(0)));

    assert!(activities.get_by_id(ActivityId(99)).await.is_none());
    let err = activities
        .update(ActivityId(99), &ActivityPatch::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::NotFound {
            entity: "activity",
            id: 99
        }
    );
    let err = activities.delete(ActivityId(99)).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { id: 99, .. }));

    activities.delete(ActivityId(4)).await.unwrap();
    assert_eq!(ids(&activities.get_all().await), vec![1, 3, 2]);
}

#[tokio::test]
async fn update_with_blank_content_changes_nothing() {
    let activities = activity_service(Arc::new(ManualClock::new(0)));
    let before = activities.get_all().await;

    let patch = ActivityPatch {
        content: Some("   ".to_string()),
        kind: Some(ActivityType::Meeting),
        ..ActivityPatch::default()
    };
    let err = activities.update(ActivityId(1), &patch).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Invalid(ValidationError::BlankField("content"))
    );
    assert_eq!(activities.get_all().await, before);
}
