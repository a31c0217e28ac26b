use super::*;

fn wav_header(byte_rate: u32, data_len: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&44_100u32.to_le_bytes()); // sample rate
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.extend(std::iter::repeat(0u8).take(data_len as usize));
    bytes
}

#[test]
fn duration_is_computed_from_data_chunk_and_byte_rate() {
    let bytes = wav_header(88_200, 88_200 * 2);
    let duration = duration_from_header(&bytes).expect("valid header");
    assert_eq!(duration, Duration::from_secs(2));
}

#[test]
fn non_wav_bytes_are_rejected() {
    assert!(duration_from_header(b"not a wav file at all").is_none());
}

#[test]
fn truncated_header_is_rejected() {
    assert!(duration_from_header(b"RIFF\x00\x00\x00\x00WAVE").is_none());
}

#[tokio::test]
async fn wav_duration_reads_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("clip.wav");
    tokio::fs::write(&path, wav_header(16_000, 16_000)).await.expect("write");

    let duration = wav_duration(&path).await.expect("read ok");
    assert_eq!(duration, Duration::from_secs(1));
}
