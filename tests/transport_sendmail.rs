use courriel::{Body, Mailbox, Message, SendmailTransport, Transport};

#[test]
#[ignore] // needs a local sendmail binary
fn sendmail_transport_simple() {
    let sender = Mailbox::new("user@localhost".parse().unwrap(), None);
    let message = Message::new("sendmail test", Body::plain("Hello sendmail"), sender);

    let mut transport = SendmailTransport::new();
    let result = transport.send(&message, &["root@localhost".parse().unwrap()]);
    assert_eq!(result.unwrap(), 1);
}
