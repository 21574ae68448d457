use ini::{Document, LineBreak, ParseOptions, StringifyOptions};
use pretty_assertions::assert_eq;

const TEXT: &str = "; top\n\n[a]\nx=1\n\n[b] ; note\n# hidden\ny=2\n[c]\nz=3\n";

#[test]
fn default_options_change_nothing() {
    let document = Document::parse(TEXT);

    assert_eq!(document.stringify(&StringifyOptions::default()), TEXT);
}

#[test]
fn remove_blank_lines() {
    let options = StringifyOptions {
        remove_blank_lines: true,
        ..StringifyOptions::default()
    };

    assert_eq!(
        Document::parse(TEXT).stringify(&options),
        "; top\n[a]\nx=1\n[b] ; note\n# hidden\ny=2\n[c]\nz=3"
    );
}

#[test]
fn remove_comment_lines_keeps_headers() {
    let options = StringifyOptions {
        remove_comment_lines: true,
        ..StringifyOptions::default()
    };

    assert_eq!(
        Document::parse(TEXT).stringify(&options),
        "\n[a]\nx=1\n\n[b] ; note\ny=2\n[c]\nz=3\n"
    );
}

#[test]
fn blank_line_before_section() {
    let options = StringifyOptions {
        blank_line_before_section: true,
        ..StringifyOptions::default()
    };

    assert_eq!(
        Document::parse(TEXT).stringify(&options),
        "; top\n\n[a]\nx=1\n\n[b] ; note\n# hidden\ny=2\n\n[c]\nz=3\n"
    );
}

#[test]
fn combined_options() {
    let options = StringifyOptions {
        remove_blank_lines: true,
        remove_comment_lines: true,
        blank_line_before_section: true,
    };

    assert_eq!(
        Document::parse(TEXT).stringify(&options),
        "[a]\nx=1\n\n[b] ; note\ny=2\n\n[c]\nz=3"
    );
}

#[test]
fn output_uses_the_document_line_break() {
    let mut document = Document::parse(TEXT);
    document.set_line_break(LineBreak::CrLf);

    assert_eq!(document.to_string(), TEXT.replace('\n', "\r\n"));
}

#[test]
fn options_load_from_config() {
    let options: StringifyOptions =
        serde_json::from_str(r#"{ "removeBlankLines": true, "blankLineBeforeSection": true }"#)
            .expect("valid options");
    assert_eq!(
        options,
        StringifyOptions {
            remove_blank_lines: true,
            remove_comment_lines: false,
            blank_line_before_section: true,
        }
    );

    let options: ParseOptions =
        serde_json::from_str(r#"{ "lineBreak": "crlf" }"#).expect("valid options");
    assert_eq!(options.line_break, Some(LineBreak::CrLf));
    assert_eq!(options.default_line_break, LineBreak::Lf);
}
