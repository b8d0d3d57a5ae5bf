#[test]
fn test_prefix() {
    use super::prefix;

    assert_eq!(prefix(" abra ".split(' '), 5, " ").length, 5);
    assert_eq!(prefix("abra a".split(' '), 5, " ").length, 4);
    assert_eq!(prefix("a a br".split(' '), 5, " ").length, 3);
}

#[test]
fn test_lines() {
    use super::make_lines;

    let content = "This is a line.\n\nThis is a second line.";
    let rows = make_lines(content, 30);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].width, 0);
}

#[test]
fn test_wrap() {
    use super::make_lines;

    let content = "A somewhat longer line of text.";
    let rows = make_lines(content, 12);

    // Each row fits, and no content is lost.
    for row in &rows {
        assert!(row.width <= 12);
    }
    assert_eq!(rows.first().map(|r| r.start), Some(0));
    assert_eq!(rows.last().map(|r| r.end), Some(content.len()));
}

#[test]
fn test_long_word() {
    use super::make_lines;

    let rows = make_lines("incomprehensibilities", 8);
    assert!(rows.len() > 1);
    for row in &rows {
        assert!(row.width <= 8);
    }
}
