/// Replace `${ENV_VAR}` placeholders in config string values.
///
/// Unresolvable variables are left as-is so the parse error points at the
/// placeholder rather than at an empty token.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        match tail.find('}') {
            Some(end) if end > 0 => {
                let name = &tail[..end];
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    },
                }
                rest = &tail[end + 1..];
            },
            _ => {
                // Malformed placeholder: emit literally and move on.
                out.push_str("${");
                rest = tail;
            },
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_var() {
        let lookup = |name: &str| (name == "MIMIC_TOKEN").then(|| "abc123".to_string());
        assert_eq!(
            substitute_with("token = \"${MIMIC_TOKEN}\"", lookup),
            "token = \"abc123\""
        );
    }

    #[test]
    fn leaves_unknown_var_in_place() {
        assert_eq!(
            substitute_with("${MIMIC_NO_SUCH_VAR}", |_| None),
            "${MIMIC_NO_SUCH_VAR}"
        );
    }

    #[test]
    fn handles_multiple_placeholders() {
        let lookup = |name: &str| match name {
            "A" => Some("1".to_string()),
            "B" => Some("2".to_string()),
            _ => None,
        };
        assert_eq!(substitute_with("${A}-${B}-${C}", lookup), "1-2-${C}");
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(substitute_with("prefix ${OOPS", |_| None), "prefix ${OOPS");
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(substitute_env("no placeholders here"), "no placeholders here");
    }
}
