use std::{fs::File, io::Write, path::PathBuf};

use courriel::{Attachment, Body, Mailbox, Message};

fn sender() -> Mailbox {
    Mailbox::new(
        "no-reply@example.com".parse().unwrap(),
        Some("Example Sender".into()),
    )
}

fn temp_file(name: &str, content: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

fn boundary_of(text: &str, content_type: &str) -> String {
    text.lines()
        .find(|l| l.starts_with(&format!("Content-Type: {content_type}; boundary=")))
        .and_then(|l| l.split('"').nth(1))
        .unwrap_or_else(|| panic!("no {content_type} boundary in:\n{text}"))
        .to_owned()
}

#[test]
fn full_message_with_attachment() {
    let path = temp_file("courriel_compose_full.txt", b"attached content");
    let attachment = Attachment::new(&path, None, None, None, None).unwrap();

    let message = Message::new(
        "Quarterly report",
        Body::alternative("<h1>Report</h1>", "Report"),
        sender(),
    )
    .header("X-Campaign", "q3")
    .unwrap()
    .attachment(attachment);

    let compiled = message.compile().unwrap();
    let text = String::from_utf8(compiled.body().to_vec()).unwrap();

    // Compiler-owned headers come first, in a fixed order
    let header_positions: Vec<usize> = [
        "From: Example Sender <no-reply@example.com>",
        "Subject: Quarterly report",
        "MIME-Version: 1.0",
        "X-Mailer: ",
        "Content-Type: multipart/mixed; boundary=",
        "X-Campaign: q3",
    ]
    .iter()
    .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
    .collect();
    assert!(header_positions.windows(2).all(|w| w[0] < w[1]));

    assert!(text.contains("This is a multi-part message in MIME format."));

    // Outer boundary delimits the alternative block and the attachment,
    // and is closed exactly once
    let outer = boundary_of(&text, "multipart/mixed");
    assert_eq!(text.lines().filter(|l| *l == format!("--{outer}")).count(), 2);
    assert_eq!(
        text.lines().filter(|l| *l == format!("--{outer}--")).count(),
        1
    );

    let inner = boundary_of(&text, "multipart/alternative");
    assert_ne!(outer, inner);
    assert_eq!(text.lines().filter(|l| *l == format!("--{inner}")).count(), 2);
    assert_eq!(
        text.lines().filter(|l| *l == format!("--{inner}--")).count(),
        1
    );

    // Attachment part is base64 with the original file name
    assert!(text.contains("Content-Type: text/plain; name=\"courriel_compose_full.txt\""));
    assert!(text.contains("Content-Transfer-Encoding: base64"));
    assert!(text.contains("YXR0YWNoZWQgY29udGVudA=="));

    std::fs::remove_file(path).unwrap();
}

#[test]
fn attachment_vanishing_after_validation_fails_the_compile() {
    let path = temp_file("courriel_compose_vanish.txt", b"gone soon");
    let attachment = Attachment::new(&path, None, None, None, None).unwrap();
    std::fs::remove_file(&path).unwrap();

    let message = Message::new("hello", Body::plain("hi"), sender()).attachment(attachment);
    assert!(message.compile().is_err());
}

#[test]
fn plain_only_message_skips_the_html_part() {
    let message = Message::new("hello", Body::plain("just text"), sender());
    let compiled = message.compile().unwrap();
    let text = String::from_utf8(compiled.body().to_vec()).unwrap();

    assert!(text.contains("Content-Type: text/plain; charset=us-ascii"));
    assert!(!text.contains("Content-Type: text/html"));
}
