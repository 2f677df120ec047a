use crate::block_parser::tests::helpers::{assert_token_names, assert_tokens};

#[test]
fn atx_then_setext() {
    assert_tokens(
        "# Foo\nFoo\n===\n",
        &[
            "[atx(1,1):1:: ]",
            "[text(1,3):Foo:]",
            "[end-atx::false]",
            "[setext(2,1):=:]",
            "[text(2,1):Foo:]",
            "[end-setext:===:false]",
            "[BLANK(4,1):]",
        ],
    );
}

#[test]
fn closing_sequence_is_kept() {
    assert_tokens(
        "## foo ##\n",
        &[
            "[atx(1,1):2:: ]",
            "[text(1,4):foo:]",
            "[end-atx: ##:false]",
            "[BLANK(2,1):]",
        ],
    );
}

#[test]
fn empty_heading_has_no_text() {
    assert_tokens("#", &["[atx(1,1):1::]", "[end-atx::false]"]);
}

#[test]
fn lazy_line_cannot_underline() {
    assert_token_names(
        "> foo\n---\n",
        &[
            "block-quote",
            "para",
            "text",
            "end-para",
            "end-block-quote",
            "tbreak",
            "end-tbreak",
            "BLANK",
        ],
    );
}

#[test]
fn multi_line_setext_heading() {
    assert_tokens(
        "a\n  b\n---",
        &[
            "[setext(1,1):-:\\n  ]",
            "[text(1,1):a\\nb:]",
            "[end-setext:---:false]",
        ],
    );
}

#[test]
fn thematic_break_tokens() {
    assert_tokens(
        " * * *",
        &["[tbreak(1,2):*: :* * *]", "[end-tbreak::false]"],
    );
}
