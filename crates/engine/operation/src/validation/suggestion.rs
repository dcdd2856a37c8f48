/// ` Did you mean 'a', 'b', or 'c'?` with at most five suggestions, empty without any.
pub(crate) fn did_you_mean(suggestions: &[String]) -> String {
    let quoted: Vec<_> = suggestions.iter().take(5).map(|s| format!("'{s}'")).collect();
    let body = match quoted.as_slice() {
        [] => return String::new(),
        [one] => one.clone(),
        [first, second] => format!("{first} or {second}"),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    };
    format!(" Did you mean {body}?")
}

/// Options close enough to `input`, closest first.
pub(crate) fn suggestion_list<'a>(input: &str, options: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let threshold = input.chars().count() * 4 / 10 + 1;
    let input_lowercase = input.to_lowercase();

    let mut suggestions: Vec<(usize, &str)> = options
        .into_iter()
        .filter_map(|option| {
            let distance = if option == input {
                0
            } else {
                lexical_distance(&input_lowercase, &option.to_lowercase())
            };
            (distance <= threshold).then_some((distance, option))
        })
        .collect();
    suggestions.sort_by(|(a_distance, a), (b_distance, b)| a_distance.cmp(b_distance).then_with(|| a.cmp(b)));
    suggestions.into_iter().map(|(_, option)| option.to_string()).collect()
}

/// Optimal string alignment distance, a case change alone counts as one edit.
fn lexical_distance(a: &str, b: &str) -> usize {
    if a == b {
        1
    } else {
        strsim::osa_distance(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting() {
        assert_eq!(did_you_mean(&[]), "");
        assert_eq!(did_you_mean(&["a".into()]), " Did you mean 'a'?");
        assert_eq!(did_you_mean(&["a".into(), "b".into()]), " Did you mean 'a' or 'b'?");
        assert_eq!(
            did_you_mean(&["a", "b", "c", "d", "e", "f"].map(String::from)),
            " Did you mean 'a', 'b', 'c', 'd', or 'e'?"
        );
    }

    #[test]
    fn suggestions() {
        assert_eq!(suggestion_list("helo", ["hello", "helloAsync", "alwaysFail"]), ["hello"]);
        assert_eq!(suggestion_list("HELLO", ["hello"]), ["hello"]);
        assert_eq!(suggestion_list("mistake", ["hello", "helloAsync", "alwaysFail"]), Vec::<String>::new());
        assert_eq!(suggestion_list("ab", ["ba", "ab", "abc"]), ["ab", "abc", "ba"]);
    }

    #[test]
    fn distances() {
        assert_eq!(lexical_distance("abc", "abc"), 1);
        assert_eq!(lexical_distance("abc", "acb"), 1);
        assert_eq!(lexical_distance("abc", "xyz"), 3);
        assert_eq!(lexical_distance("", "ab"), 2);
    }
}
