use super::*;

#[tokio::test]
async fn round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("link.json");
    let link = CloudLink {
        bucket: "bucket".to_string(),
        prefix: "jobs".to_string(),
        cloud_job_id: "cj-123".to_string(),
    };

    write(&path, &link).await.expect("write");
    let read_back = read(&path).await.expect("read").expect("present");

    assert_eq!(read_back.cloud_job_id, "cj-123");
    assert_eq!(read_back.bucket, "bucket");
}

#[tokio::test]
async fn missing_link_reads_as_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    assert!(read(&path).await.expect("read ok").is_none());
}

#[test]
fn object_key_is_assembled_from_the_link() {
    let link = CloudLink {
        bucket: "bucket".to_string(),
        prefix: "jobs".to_string(),
        cloud_job_id: "cj-123".to_string(),
    };
    let key = link.object_key("progress.json");
    assert_eq!(key.bucket, "bucket");
    assert_eq!(key.key, "progress.json");
}
