use super::*;
use bytes::Bytes;
use http::Method;
use mf_wire::MultiHeaderMap;
use serde_json::json;

fn plugin() -> (Arc<D1Plugin>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    (Arc::new(D1Plugin::new(dir.path().to_path_buf(), None)), dir)
}

fn request(body: serde_json::Value) -> UniversalRequest {
    UniversalRequest {
        method: Method::POST,
        url: "/irrelevant".to_string(),
        headers: MultiHeaderMap::new(),
        body: Bytes::from(serde_json::to_vec(&body).expect("serializes")),
    }
}

#[tokio::test]
async fn execute_then_query_round_trips_through_the_router() {
    let (plugin, _dir) = plugin();
    let create = json!({"sql": "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", "params": []});
    let resp = plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::POST, "/mydb/execute", request(create))
        .await
        .expect("route matched")
        .expect("execute succeeded");
    assert_eq!(resp.status, 200);

    let insert = json!({"sql": "INSERT INTO t (id, name) VALUES (?, ?)", "params": [1, "ada"]});
    plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::POST, "/mydb/execute", request(insert))
        .await
        .expect("route matched")
        .expect("insert succeeded");

    let query = json!({"sql": "SELECT id, name FROM t", "params": []});
    let resp = plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::POST, "/mydb/query", request(query))
        .await
        .expect("route matched")
        .expect("query succeeded");
    let parsed: D1Response = serde_json::from_slice(resp.body.as_bytes()).expect("valid json");
    assert_eq!(parsed.results[0].results.len(), 1);
}

#[tokio::test]
async fn execute_of_select_is_bad_request() {
    let (plugin, _dir) = plugin();
    let select = json!({"sql": "SELECT 1", "params": []});
    let err = plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::POST, "/mydb/execute", request(select))
        .await
        .expect("route matched")
        .expect_err("select via execute is rejected");
    assert_eq!(err.status, 400);
}

#[tokio::test]
async fn batch_round_trips_through_the_router() {
    let (plugin, _dir) = plugin();
    let create = json!({"sql": "CREATE TABLE t (id INTEGER)", "params": []});
    plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::POST, "/mydb/execute", request(create))
        .await
        .expect("route matched")
        .expect("create succeeded");

    let batch = json!([
        {"sql": "INSERT INTO t (id) VALUES (1)", "params": []},
        {"sql": "INSERT INTO t (id) VALUES (2)", "params": []},
    ]);
    let resp = plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::POST, "/mydb/batch", request(batch))
        .await
        .expect("route matched")
        .expect("batch succeeded");
    let parsed: D1Response = serde_json::from_slice(resp.body.as_bytes()).expect("valid json");
    assert!(parsed.success);
    assert_eq!(parsed.results.len(), 2);
}

#[tokio::test]
async fn dump_of_memory_namespace_is_not_found() {
    let (plugin, _dir) = plugin();
    let req = UniversalRequest {
        method: Method::GET,
        url: "/mydb/dump".to_string(),
        headers: MultiHeaderMap::new(),
        body: Bytes::new(),
    };
    let err = plugin
        .router()
        .dispatch(Arc::clone(&plugin), &Method::GET, "/mydb/dump", req)
        .await
        .expect("route matched")
        .expect_err("in-memory namespace has nothing to dump");
    assert_eq!(err.status, 404);
}
