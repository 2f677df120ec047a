use crate::block_parser::tests::helpers::{assert_token_names, assert_tokens};

#[test]
fn heading_and_paragraph_in_quote() {
    assert_token_names(
        "> # Foo\n> bar\n> baz\n",
        &[
            "block-quote",
            "atx",
            "text",
            "end-atx",
            "para",
            "text",
            "end-para",
            "end-block-quote",
            "BLANK",
        ],
    );
}

#[test]
fn nested_quote_with_lazy_inner_line() {
    assert_tokens(
        ">> a\n> b\n",
        &[
            "[block-quote(1,1)::>\\n> ]",
            "[block-quote(1,2)::> \\n]",
            "[para(1,4):\\n]",
            "[text(1,4):a\\nb:]",
            "[end-para::true]",
            "[end-block-quote::true]",
            "[end-block-quote::true]",
            "[BLANK(3,1):]",
        ],
    );
}

#[test]
fn blank_marker_line_splits_paragraphs() {
    assert_tokens(
        "> a\n>\n> b\n",
        &[
            "[block-quote(1,1)::> \\n>\\n> ]",
            "[para(1,3):]",
            "[text(1,3):a:]",
            "[end-para::true]",
            "[BLANK(2,2):]",
            "[para(3,3):]",
            "[text(3,3):b:]",
            "[end-para::true]",
            "[end-block-quote::true]",
            "[BLANK(4,1):]",
        ],
    );
}

#[test]
fn missing_marker_ends_fenced_code_in_quote() {
    assert_token_names(
        "> ```\n> code\n```\n",
        &[
            "block-quote",
            "fcode-block",
            "text",
            "end-fcode-block",
            "end-block-quote",
            "fcode-block",
            "BLANK",
            "end-fcode-block",
        ],
    );
}

#[test]
fn tab_after_marker_is_split() {
    assert_tokens(
        ">\tfoo",
        &[
            "[block-quote(1,1)::>\\t]",
            "[para(1,5):]",
            "[text(1,5):foo:]",
            "[end-para::true]",
            "[end-block-quote::true]",
        ],
    );
}

#[test]
fn indented_code_in_quote() {
    assert_tokens(
        ">     code",
        &[
            "[block-quote(1,1)::> ]",
            "[icode-block(1,3)]",
            "[text(1,7):code:    ]",
            "[end-icode-block::true]",
            "[end-block-quote::true]",
        ],
    );
}

#[test]
fn marker_inside_fenced_code_is_content() {
    assert_token_names(
        "> ```\n> > not a quote\n> ```\n",
        &[
            "block-quote",
            "fcode-block",
            "text",
            "end-fcode-block",
            "end-block-quote",
            "BLANK",
        ],
    );
}
