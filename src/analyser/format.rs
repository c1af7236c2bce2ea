//! Regrouping of whitespace-split tokens that were originally one quoted phrase.

/// Quote characters recognised by [`format`].
pub const DEFAULT_QUOTES: &[char] = &['"', '\'', '`'];

/// Regroup quoted phrases using [`DEFAULT_QUOTES`].
///
/// `["say", "\"hello", "world\""]` becomes `["say", "hello world"]`.
pub fn format<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    format_with(args, DEFAULT_QUOTES)
}

/// Regroup quoted phrases delimited by any character in `quotes`.
///
/// A token opens a phrase when the first quote character it contains occurs
/// in it exactly once. The phrase extends to the next token containing that
/// same character; the tokens are joined with single spaces and every
/// occurrence of the quote character is removed. When no closing token exists
/// (or an empty token is reached first) the opening token is kept as-is and
/// scanning resumes right after it.
///
/// Tokens that already contain the quote character twice or more are passed
/// through untouched.
pub fn format_with<S: AsRef<str>>(args: &[S], quotes: &[char]) -> Vec<String> {
    let mut rebuilt = Vec::with_capacity(args.len());
    let mut index = 0;

    while index < args.len() {
        let arg = args[index].as_ref();

        let closing = opening_quote(arg, quotes)
            .and_then(|quote| find_closing(args, index, quote).map(|end| (quote, end)));

        match closing {
            Some((quote, end)) => {
                let joined = args[index..=end]
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<&str>>()
                    .join(" ");
                rebuilt.push(joined.replace(quote, ""));
                index = end + 1;
            }
            None => {
                rebuilt.push(arg.to_string());
                index += 1;
            }
        }
    }

    rebuilt
}

/// Return the quote character that opens a phrase in `arg`, if any.
fn opening_quote(arg: &str, quotes: &[char]) -> Option<char> {
    let quote = arg.chars().find(|c| quotes.contains(c))?;
    (arg.matches(quote).count() < 2).then_some(quote)
}

/// Scan forward from `start` for the token that closes the phrase.
fn find_closing<S: AsRef<str>>(args: &[S], start: usize, quote: char) -> Option<usize> {
    args.iter()
        .enumerate()
        .skip(start + 1)
        .map(|(i, arg)| (i, arg.as_ref()))
        .take_while(|(_, arg)| !arg.is_empty())
        .find(|(_, arg)| arg.contains(quote))
        .map(|(i, _)| i)
}
