use crate::block_parser::tests::helpers::{assert_token_names, assert_tokens};

#[test]
fn block_tag_ends_at_blank_line() {
    assert_tokens(
        "<div>\nfoo\n\nbar\n",
        &[
            "[html-block(1,1):6]",
            "[text(1,1):<div>:]",
            "[text(2,1):foo:]",
            "[end-html-block::true]",
            "[BLANK(3,1):]",
            "[para(4,1):]",
            "[text(4,1):bar:]",
            "[end-para::true]",
            "[BLANK(5,1):]",
        ],
    );
}

#[test]
fn comment_closing_on_its_own_line() {
    assert_token_names(
        "<!-- x -->\na\n",
        &[
            "html-block",
            "text",
            "end-html-block",
            "para",
            "text",
            "end-para",
            "BLANK",
        ],
    );
}

#[test]
fn comment_spans_blank_lines() {
    assert_token_names(
        "<!--\n\n-->\n",
        &["html-block", "text", "BLANK", "text", "end-html-block", "BLANK"],
    );
}

#[test]
fn complete_tag_cannot_interrupt_paragraph() {
    assert_token_names("a\n<span>\n", &["para", "text", "end-para", "BLANK"]);
}

#[test]
fn complete_tag_starts_block_after_blank() {
    assert_tokens(
        "<span>\n",
        &[
            "[html-block(1,1):7]",
            "[text(1,1):<span>:]",
            "[end-html-block::true]",
            "[BLANK(2,1):]",
        ],
    );
}
