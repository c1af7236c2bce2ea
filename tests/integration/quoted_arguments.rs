use super::validator;

use argsig::analyser::lookup::Directory;
use argsig::analyser::{Value, format, format_with};
use rstest::rstest;

#[rstest]
#[case::phrase(&["say", "\"hello", "world\""], &["say", "hello world"])]
#[case::self_delimited(&["a", "'x'", "b"], &["a", "'x'", "b"])]
#[case::backtick(&["`a", "b", "c`", "d"], &["a b c", "d"])]
#[case::unclosed(&["\"open", "b", "c"], &["\"open", "b", "c"])]
#[case::two_phrases(&["'a", "b'", "\"c", "d\""], &["a b", "c d"])]
#[case::no_quotes(&["a", "b"], &["a", "b"])]
fn format_regroups_quoted_phrases(#[case] input: &[&str], #[case] expected: &[&str]) {
    assert_eq!(format(input), expected);
}

#[rstest]
fn format_with_custom_quotes_ignores_defaults() {
    assert_eq!(
        format_with(&["|a", "b|", "\"c", "d\""], &['|']),
        vec!["a b", "\"c", "d\""]
    );
}

#[rstest]
#[tokio::test]
async fn formatted_tokens_validate_as_single_arguments() {
    let input = format(&["ban", "\"bad", "actor\"", "7"]);
    let input: Vec<&str> = input.iter().map(String::as_str).collect();
    let (mut validator, _) = validator(
        r#"<"ban"|"kick"> <reason:string> [days:number]"#,
        &input,
        Directory::default(),
    );

    validator.validate().await;

    assert_eq!(
        validator.collected(),
        &[
            Value::from("ban"),
            Value::from("bad actor"),
            Value::Number(7.0)
        ]
    );
}
