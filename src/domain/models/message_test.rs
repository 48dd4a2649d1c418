use super::Author;
use super::Message;

#[test]
fn it_executes_new() {
    let msg = Message::new(1, Author::System, "はじめに");
    assert_eq!(msg.id, 1);
    assert_eq!(msg.author, Author::System);
    assert_eq!(msg.author.to_string(), "システム");
    assert_eq!(msg.text(), "はじめに");
    assert!(!msg.is_pending());
}

#[test]
fn it_executes_new_replacing_tabs() {
    let msg = Message::new(1, Author::User, "\t\tHi there!");
    assert_eq!(msg.text(), "    Hi there!");
}

#[test]
fn it_executes_new_pending() {
    let msg = Message::new_pending(2, Author::Assistant);
    assert_eq!(msg.author, Author::Assistant);
    assert_eq!(msg.text(), "");
    assert!(msg.is_pending());
}

#[test]
fn it_replaces_text_and_finalizes() {
    let mut msg = Message::new_pending(2, Author::Assistant);
    msg.replace_text("Hel");
    msg.replace_text("Hello, world");
    assert_eq!(msg.text(), "Hello, world");

    msg.finalize();
    assert!(!msg.is_pending());
}

#[test]
fn it_wraps_words_to_width() {
    let msg = Message::new(1, Author::Assistant, "one two three four five six");
    let lines = msg.as_string_lines(10);

    assert_eq!(lines, vec!["one two", "three", "four five", "six"]);
}

#[test]
fn it_wraps_spaceless_text_by_chars() {
    let msg = Message::new(1, Author::Assistant, "それはいつ頃からですか");

    insta::assert_snapshot!(msg.as_string_lines(5).join("\n"), @r###"
    それはいつ
    頃からです
    か
    "###);
}

#[test]
fn it_wraps_mixed_paragraphs() {
    let msg = Message::new(
        1,
        Author::Assistant,
        "Pain scale goes from zero to ten.\n\n痛みの強さを教えてください。",
    );

    assert_eq!(
        msg.as_string_lines(12),
        vec![
            "Pain scale",
            "goes from",
            "zero to",
            "ten.",
            " ",
            "痛みの強さを教えてくださ",
            "い。"
        ]
    );
}

#[test]
fn it_keeps_blank_lines() {
    let msg = Message::new(1, Author::Assistant, "a\n\nb");
    let lines = msg.as_string_lines(10);

    assert_eq!(lines, vec!["a", " ", "b"]);
}
