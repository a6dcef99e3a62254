//! HTML pages served to the `go` tool and to browsers.

use askama::Template;

use crate::routing::VcsKind;

/// Listing of every registered import path.
#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html>
<h1>Welcome to {{ host }}</h1>
<ul>
{% for path in imports %}<li><a href="https://pkg.go.dev/{{ path }}">{{ path }}</a></li>{% endfor %}
</ul>
</html>
"#
)]
pub struct IndexPage<'a> {
    pub host: &'a str,
    pub imports: Vec<String>,
}

/// Meta-tag page answering `?go-get=1` requests.
#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html>
<head>
<meta http-equiv="Content-Type" content="text/html; charset=utf-8"/>
<meta name="go-import" content="{{ import_path }} {{ vcs }} {{ repo }}">
<meta name="go-source" content="{{ import_path }} {{ display }}">
</head>
<body>
Nothing to see here folks!
</body>
</html>"#
)]
pub struct ImportPage<'a> {
    pub import_path: String,
    pub vcs: VcsKind,
    pub repo: &'a str,
    pub display: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_page() {
        let page = IndexPage {
            host: "go.example.com",
            imports: vec!["go.example.com/a".to_string(), "go.example.com/b".to_string()],
        };
        let html = page.render().unwrap();
        assert!(html.contains("<h1>Welcome to go.example.com</h1>"));
        assert!(html.contains(
            r#"<li><a href="https://pkg.go.dev/go.example.com/a">go.example.com/a</a></li><li><a href="https://pkg.go.dev/go.example.com/b">go.example.com/b</a></li>"#
        ));
    }

    #[test]
    fn test_import_page() {
        let page = ImportPage {
            import_path: "go.example.com/tool".to_string(),
            vcs: VcsKind::Git,
            repo: "https://github.com/user/tool",
            display: "https://github.com/user/tool https://github.com/user/tool/tree/master{/dir} https://github.com/user/tool/blob/master{/dir}/{file}#L{line}",
        };
        let html = page.render().unwrap();
        assert!(html.contains(
            r#"<meta name="go-import" content="go.example.com/tool git https://github.com/user/tool">"#
        ));
        assert!(html.contains(
            r#"<meta name="go-source" content="go.example.com/tool https://github.com/user/tool https://github.com/user/tool/tree/master{/dir} https://github.com/user/tool/blob/master{/dir}/{file}#L{line}">"#
        ));
    }

    #[test]
    fn test_host_is_escaped() {
        let page = IndexPage {
            host: "<script>",
            imports: Vec::new(),
        };
        let html = page.render().unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&#60;script&#62;"));
    }
}
