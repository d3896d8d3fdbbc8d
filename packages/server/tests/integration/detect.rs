use platewatch_server::prediction::PredictionError;

use crate::common::{TestApp, routes};

const CAR_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

#[tokio::test]
async fn single_plate_creates_one_record_and_one_image() {
    let app = TestApp::spawn().await;
    let session = app.login("alice").await;
    app.predictor.push_plates(&[("B 1234 XY", Some("Jakarta"))]);

    let res = app.detect(CAR_JPEG.to_vec(), Some(&session)).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["message"], "Success");
    let id = res.body["redirect"].as_str().unwrap().to_string();
    assert_eq!(res.body["items"][0], id.as_str());
    assert_eq!(app.stored_image_count(), 1);

    let detail = app
        .get_with_session(&routes::vehicle(&id), &session)
        .await;
    assert_eq!(detail.status, 200, "{}", detail.text);
    assert_eq!(detail.body["plateNumber"], "B 1234 XY");
    assert_eq!(detail.body["region"], "Jakarta");
    assert_eq!(detail.body["owner"], "alice");
    assert!(detail.body["timestamp"].is_i64());

    let image_url = detail.body["imageUrl"].as_str().unwrap();
    assert!(image_url.contains("/images/B_1234_XY-"));
    let image = app.fetch(image_url).await;
    assert_eq!(image.status(), 200);
    assert_eq!(&image.bytes().await.unwrap()[..3], &[0xFF, 0xD8, 0xFF]);
}

#[tokio::test]
async fn several_plates_redirect_to_an_items_query_in_detection_order() {
    let app = TestApp::spawn().await;
    let session = app.login("alice").await;
    app.predictor.push_plates(&[
        ("AAA1", Some("North")),
        ("BBB2", Some("South")),
        ("CCC3", None),
    ]);

    let res = app.detect(CAR_JPEG.to_vec(), Some(&session)).await;

    assert_eq!(res.status, 200, "{}", res.text);
    let items: Vec<String> = res.body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(items.len(), 3);
    assert_eq!(
        res.body["redirect"],
        format!("?items={}", items.join(",")).as_str()
    );
    assert_eq!(app.stored_image_count(), 3);

    for (id, plate) in items.iter().zip(["AAA1", "BBB2", "CCC3"]) {
        let detail = app.get_with_session(&routes::vehicle(id), &session).await;
        assert_eq!(detail.body["plateNumber"], plate);
    }

    let list = app.get_with_session(routes::LIST, &session).await;
    assert_eq!(list.body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn no_plate_detected_writes_nothing() {
    let app = TestApp::spawn().await;
    let session = app.login("alice").await;
    app.predictor.push_plates(&[]);

    let res = app.detect(CAR_JPEG.to_vec(), Some(&session)).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "NO_PLATE_DETECTED");
    assert_eq!(app.stored_image_count(), 0);

    let total = app.get_with_session(routes::TOTAL, &session).await;
    assert_eq!(total.body["total"], 0);
}

#[tokio::test]
async fn missing_image_is_rejected() {
    let app = TestApp::spawn().await;
    let session = app.login("alice").await;

    let empty = app.detect(Vec::new(), Some(&session)).await;

    assert_eq!(empty.status, 400);
    assert_eq!(empty.body["code"], "NO_IMAGE");

    let not_multipart = app
        .client
        .post(app.url(routes::DETECT))
        .header(
            reqwest::header::COOKIE,
            format!("token={}; uid={}", session.token, session.uid),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(not_multipart.status(), 400);
}

#[tokio::test]
async fn prediction_failure_is_a_server_error() {
    let app = TestApp::spawn().await;
    let session = app.login("alice").await;
    app.predictor.push_failure(PredictionError::Status(503));

    let res = app.detect(CAR_JPEG.to_vec(), Some(&session)).await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "UPSTREAM_ERROR");
    assert_eq!(app.stored_image_count(), 0);
}

#[tokio::test]
async fn detect_requires_a_session() {
    let app = TestApp::spawn().await;
    app.predictor.push_plates(&[("AAA1", None)]);

    let res = app.detect(CAR_JPEG.to_vec(), None).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
    assert_eq!(app.stored_image_count(), 0);
}
