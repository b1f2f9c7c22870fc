/// `pre_chorus` -> `Pre Chorus`.
pub fn title_case(name: &str) -> String {
    name.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
pub fn assert_transformed(
    input: &str,
    transformer: &dyn crate::transforms::Transformer,
    expected: &str,
) {
    use crate::parser::{ParserConfig, parse_document};

    let input = input.strip_prefix('\n').unwrap_or(input);
    let expected = expected.strip_prefix('\n').unwrap_or(expected);
    let document = parse_document(input, &ParserConfig::default()).expect("Failed to parse input");
    let transformed = transformer.transform(&document);
    pretty_assertions::assert_eq!(transformed.render_text(None), expected);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tests() {
        assert_eq!(title_case("chorus"), "Chorus");
        assert_eq!(title_case("pre_chorus"), "Pre Chorus");
        assert_eq!(title_case("middle 8"), "Middle 8");
        assert_eq!(title_case(""), "");
    }
}
