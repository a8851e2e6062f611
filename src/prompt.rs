//! Prompt template for code analysis requests.

pub const FALLBACK_LANGUAGE: &str = "general programming";

pub const EXPLANATION_MARKER: &str = "**EXPLANATION:**";
pub const SUGGESTIONS_MARKER: &str = "**SUGGESTIONS:**";
pub const REFACTORED_MARKER: &str = "**REFACTORED CODE:**";

/// Language label used in the prompt; blank or absent tags become the generic label.
pub fn language_label(language: Option<&str>) -> &str {
    match language.map(str::trim) {
        Some(l) if !l.is_empty() => l,
        _ => FALLBACK_LANGUAGE,
    }
}

pub fn analysis_prompt(lang: &str, code: &str) -> String {
    format!(
        "
You are an expert {lang} software engineer.
Analyze the following {lang} code and provide a structured response with two sections:

1. **Explanation**: Explain line by line in simple terms.
2. **Suggestions**: List bugs, inefficiencies, and possible improvements or refactorings.
3. **Refactored Code**: Provide an improved, cleaner version of the code if needed.

Return output in this exact format:

{EXPLANATION_MARKER}
<your explanation>

{SUGGESTIONS_MARKER}
<your suggestions>

{REFACTORED_MARKER}
<your refactored code inside a code block>
    \n\
Code:
```{lang}
{code}
```
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_asks_for_all_three_sections() {
        let prompt = analysis_prompt("python", "print('hi')");
        assert!(prompt.contains(EXPLANATION_MARKER));
        assert!(prompt.contains(SUGGESTIONS_MARKER));
        assert!(prompt.contains(REFACTORED_MARKER));
        assert!(prompt.starts_with("\nYou are an expert python software engineer.\n"));
    }

    #[test]
    fn prompt_text_is_stable() {
        let prompt = analysis_prompt("c", "int x;");
        assert!(prompt.contains("provide a structured response with two sections:\n\n1. **Explanation**"));
        assert!(prompt.contains("<your refactored code inside a code block>\n    \nCode:\n```c\nint x;\n```\n"));
        assert!(prompt.ends_with("```\n"));
    }

    #[test]
    fn snippet_is_fenced_with_language_tag() {
        let prompt = analysis_prompt("python", "print('hi')");
        assert!(prompt.contains("```python\nprint('hi')\n```"));
    }

    #[test]
    fn missing_or_blank_language_uses_fallback() {
        assert_eq!(language_label(None), FALLBACK_LANGUAGE);
        assert_eq!(language_label(Some("  ")), FALLBACK_LANGUAGE);
        assert_eq!(language_label(Some("rust")), "rust");
    }
}
