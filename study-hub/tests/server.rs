use std::future::IntoFuture;
use std::time::Duration;
use study_hub::config::Config;
use tokio::net::TcpListener;

async fn spawn_server(config: &Config) -> (String, tokio::task::JoinHandle<Result<(), std::io::Error>>) {
    let app = study_hub::app(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(axum::serve(listener, app.into_make_service()).into_future());
    tokio::time::sleep(Duration::from_millis(100)).await;
    (format!("http://{}", addr), server)
}

#[tokio::test]
async fn server_health_endpoint() {
    let tempdir = tempfile::tempdir().unwrap();
    let (base, server) = spawn_server(&Config::with_data_dir(tempdir.path())).await;

    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.text().await.unwrap(), "OK");

    server.abort();
}

#[tokio::test]
async fn upload_attach_and_download() {
    let tempdir = tempfile::tempdir().unwrap();
    let config = Config::with_data_dir(tempdir.path());
    let (base, server) = spawn_server(&config).await;
    let client = reqwest::Client::new();

    let folder: serde_json::Value = client
        .post(format!("{}/materials/folder", base))
        .json(&serde_json::json!({"name": "Math", "parentId": "root"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let part = reqwest::multipart::Part::bytes(b"%PDF-1.4 lecture".to_vec())
        .file_name("Lecture 1.pdf")
        .mime_str("application/pdf")
        .unwrap();
    let resp = client
        .post(format!("{}/materials/upload", base))
        .multipart(reqwest::multipart::Form::new().part("file", part))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let stored: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(stored["fileName"], "Lecture 1.pdf");
    assert_eq!(stored["fileSize"], 16);

    let resp = client
        .post(format!("{}/materials/material", base))
        .json(&serde_json::json!({
            "name": "Lecture 1",
            "parentId": folder["id"],
            "materialType": "pdf",
            "filePath": stored["filePath"],
            "fileName": stored["fileName"],
            "fileSize": stored["fileSize"],
            "isFile": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let material: serde_json::Value = resp.json().await.unwrap();
    let id = material["id"].as_str().unwrap();

    let resp = client
        .get(format!("{}/materials/download/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "application/pdf");
    assert_eq!(
        resp.headers()["content-disposition"],
        "attachment; filename=\"Lecture 1.pdf\""
    );
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"%PDF-1.4 lecture");

    // the document survives a restart of the app over the same data dir
    server.abort();
    let (base, server) = spawn_server(&config).await;
    let tree: serde_json::Value = reqwest::get(format!("{}/materials", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tree["root"]["children"][0]["children"][0]["id"], id);
    server.abort();
}
