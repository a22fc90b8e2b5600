//! Browser dashboard: uploads a leaf image to `/predict` and renders the result.

const TEMPLATE: &str = include_str!("../static/dashboard.html");
const API_BASE_TOKEN: &str = "__API_BASE__";

/// Renders the dashboard with `api_base` as the target of its requests.
/// An empty base means the page talks to the server that served it.
pub fn render(api_base: &str) -> String {
    let literal = serde_json::to_string(api_base)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/");
    TEMPLATE.replace(API_BASE_TOKEN, &literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_is_injected_as_js_string() {
        let page = render("http://localhost:8000");
        assert!(page.contains(r#"const API_BASE = "http://localhost:8000";"#));
        assert!(!page.contains(API_BASE_TOKEN));
    }

    #[test]
    fn test_same_origin_default() {
        assert!(render("").contains(r#"const API_BASE = "";"#));
    }

    #[test]
    fn test_api_base_cannot_close_the_script() {
        let page = render("</script><script>alert(1)");
        assert!(!page.contains("</script><script>alert(1)"));
    }
}
