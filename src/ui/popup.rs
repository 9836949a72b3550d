use serde::{Deserialize, Serialize};

/// Popup bound to a marker: an optional bold title over a line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub title: Option<String>,
    pub content: String,
    pub visible: bool,
}

impl Popup {
    /// Plain-text popup, closed
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: content.into(),
            visible: false,
        }
    }

    /// Popup with a bold heading above the content, closed
    pub fn titled(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: content.into(),
            visible: false,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Renders the popup body as HTML. Title and content are escaped since
    /// ride text comes straight from user input.
    pub fn to_html(&self) -> String {
        match &self.title {
            Some(title) => format!(
                "<b>{}</b><br/>{}",
                escape_html(title),
                escape_html(&self.content)
            ),
            None => escape_html(&self.content),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_visibility() {
        let mut popup = Popup::new("Pickup");
        assert!(!popup.visible);

        popup.show();
        assert!(popup.visible);

        popup.hide();
        assert!(!popup.visible);
    }

    #[test]
    fn test_plain_popup_html() {
        assert_eq!(Popup::new("Pickup").to_html(), "Pickup");
    }

    #[test]
    fn test_titled_popup_html() {
        let popup = Popup::titled("Pickup", "-1.3, 36.8");
        assert_eq!(popup.to_html(), "<b>Pickup</b><br/>-1.3, 36.8");
    }

    #[test]
    fn test_popup_html_escapes_user_text() {
        let popup = Popup::titled("Destination", "<script>alert('x')</script> & co");
        assert_eq!(
            popup.to_html(),
            "<b>Destination</b><br/>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; co"
        );
    }
}
