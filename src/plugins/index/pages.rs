/// Shared shell for server-rendered pages.
///
/// Every page gets its metadata (title, canonical URL, OpenGraph tags), a
/// notification host mounted exactly once, and a centered full-viewport
/// container around the child markup. Rendering is a pure function of the
/// shell and its children.
pub(crate) struct PageShell {
    title: String,
    url: String,
    class: Option<String>,
}

impl PageShell {
    pub(crate) fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            class: None,
        }
    }

    /// Append extra classes to the viewport container.
    pub(crate) fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub(crate) fn render(&self, children: &str) -> String {
        let container_class = match &self.class {
            Some(extra) => format!("viewport-centered {extra}"),
            None => "viewport-centered".to_owned(),
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <link rel="canonical" href="{url}">
    <meta property="og:title" content="{title}">
    <meta property="og:url" content="{url}">
    <style>
        .viewport-centered {{
            display: grid;
            justify-items: center;
            align-content: center;
            min-height: 100vh;
        }}
    </style>
</head>
<body>
    <div id="notifications"></div>
    <div class="{container_class}">
{children}
    </div>
</body>
</html>
"#,
            title = self.title,
            url = self.url,
        )
    }
}
