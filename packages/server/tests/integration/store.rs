use futures::future::try_join_all;
use sea_orm::EntityTrait;
use uuid::Uuid;

use platewatch_server::entity::plate_record;
use platewatch_server::store::{NewUser, PgRecordStore, RecordStore, plate_refs};

use crate::common::TestApp;

fn record(owner: &str, plate: &str, detected_at: i64) -> plate_record::Model {
    plate_record::Model {
        id: Uuid::now_v7(),
        plate_number: plate.to_string(),
        region: Some("EU".to_string()),
        image_url: format!("http://localhost/images/{plate}.jpg"),
        detected_at,
        owner: owner.to_string(),
    }
}

async fn store_with_user(app: &TestApp, owner: &str) -> PgRecordStore {
    let store = PgRecordStore::new(app.db.clone());
    store
        .ensure_user(&NewUser {
            id: owner.to_string(),
            display_name: owner.to_string(),
            email: format!("{owner}@example.com"),
            picture_url: None,
        })
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn concurrent_inserts_for_one_owner_all_succeed() {
    let app = TestApp::spawn().await;
    let store = store_with_user(&app, "alice").await;

    for round in 0..5 {
        let records: Vec<_> = (0..3)
            .map(|i| record("alice", &format!("R{round}P{i}"), 1_718_000_000_000 + i))
            .collect();
        try_join_all(records.into_iter().map(|r| store.insert_plate(r)))
            .await
            .unwrap_or_else(|e| panic!("round {round} failed: {e}"));
    }

    assert_eq!(store.count_owned("alice").await.unwrap(), 15);
    assert_eq!(store.list_owned("alice").await.unwrap().len(), 15);
}

#[tokio::test]
async fn concurrent_deletes_keep_the_reference_list_consistent() {
    let app = TestApp::spawn().await;
    let store = store_with_user(&app, "alice").await;
    let records: Vec<_> = (0..4)
        .map(|i| record("alice", &format!("D{i}"), 1_718_000_000_000 + i))
        .collect();
    for r in &records {
        store.insert_plate(r.clone()).await.unwrap();
    }

    try_join_all(records[..3].iter().map(|r| store.delete_plate(r)))
        .await
        .unwrap();

    let remaining = store.list_owned("alice").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, records[3].id);

    let user = platewatch_server::entity::user::Entity::find_by_id("alice".to_string())
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plate_refs(&user.plate_refs), vec![records[3].id.to_string()]);
}
