const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <meta
      name="viewport"
      content="user-scalable=no, initial-scale=1.0, minimum-scale=1.0, maximum-scale=1.0, minimal-ui"
    />
    <title>GraphQL Playground</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/graphql-playground-react/build/static/css/index.css" />
    <link rel="shortcut icon" href="https://cdn.jsdelivr.net/npm/graphql-playground-react/build/favicon.png" />
    <script src="https://cdn.jsdelivr.net/npm/graphql-playground-react/build/static/js/middleware.js"></script>
  </head>
  <body>
    <div id="root"></div>
    <script>
      window.addEventListener("load", function () {
        GraphQLPlayground.init(document.getElementById("root"), {
          endpoint: {{ENDPOINT}},
        });
      });
    </script>
  </body>
</html>
"#;

/// The GraphQL Playground page sending its requests to `endpoint`, the path and query of the
/// page request.
pub(crate) fn render(endpoint: &str) -> String {
    TEMPLATE.replace("{{ENDPOINT}}", &js_string(endpoint))
}

/// A JSON string literal that can't close the surrounding `<script>`.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string().replace('<', "\\u003c")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_escaped() {
        let page = render("/graphql?a=1");
        assert!(page.contains("<title>GraphQL Playground</title>"));
        assert!(page.contains(r#"endpoint: "/graphql?a=1","#));

        let page = render(r#"/graphql?x="</script>"#);
        assert!(page.contains(r#"endpoint: "/graphql?x=\"\u003c/script>","#));
    }
}
