use super::*;
use std::path::PathBuf;

#[test]
fn placeholders_are_substituted() {
    let command = CollaboratorCommand {
        program: "ffmpeg".to_string(),
        args: vec!["-i".to_string(), "{input}".to_string(), "{output}".to_string()],
    };
    let input = PathBuf::from("/vault/source/clip.mp4");
    let output = PathBuf::from("/vault/audio/clip.wav");

    let spec = spec_for(&command, PathBuf::from("/work"), &input, &output);

    assert_eq!(spec.program, "ffmpeg");
    assert_eq!(spec.args, vec!["-i", "/vault/source/clip.mp4", "/vault/audio/clip.wav"]);
}

#[test]
fn args_without_placeholders_pass_through_unchanged() {
    let command = CollaboratorCommand { program: "true".to_string(), args: vec!["--quiet".to_string()] };
    let spec = spec_for(&command, PathBuf::from("/work"), Path::new("/a"), Path::new("/b"));
    assert_eq!(spec.args, vec!["--quiet"]);
}

#[test]
fn spec_with_substitutes_an_arbitrary_placeholder_set() {
    let command = CollaboratorCommand {
        program: "burn".to_string(),
        args: vec!["{video}".to_string(), "{captions}".to_string(), "-o".to_string(), "{output}".to_string()],
    };
    let video = PathBuf::from("/vault/source/clip.mp4");
    let captions = PathBuf::from("/vault/data/clip_finalized.json");
    let output = PathBuf::from("/delivery/clip.mp4");

    let spec = spec_with(
        &command,
        PathBuf::from("/work"),
        &[("{video}", &video), ("{captions}", &captions), ("{output}", &output)],
    );

    assert_eq!(
        spec.args,
        vec!["/vault/source/clip.mp4", "/vault/data/clip_finalized.json", "-o", "/delivery/clip.mp4"]
    );
}
