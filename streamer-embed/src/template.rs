//! Template variables and the built-in widget templates.

use streamer_platforms::StreamerStatus;

pub const ONLINE: &str = "%ONLINE%";
pub const NAME: &str = "%NAME%";
pub const VIEWERS: &str = "%VIEWERS%";
pub const DOING: &str = "%DOING%";
pub const STATUS: &str = "%STATUS%";
pub const LIFETIME_VIEWS: &str = "%LIFETIME_VIEWS%";
pub const FOLLOWERS: &str = "%FOLLOWERS%";
pub const LOGO: &str = "%LOGO%";
pub const THUMBNAIL: &str = "%THUMBNAIL%";
pub const CHANNEL_URL: &str = "%CHANNEL_URL%";
pub const LINK: &str = "%LINK%";

/// Names of the templates shipped with [`BuiltinRenderer`].
pub const BUILT_IN_TEMPLATES: &[&str] = &[
    "block",
    "debug",
    "link",
    "live",
    "minilive",
    "thumbnail",
    "viewers",
];

/// Flat placeholder → value mapping handed to a [`Renderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariables {
    values: Vec<(&'static str, String)>,
}

impl TemplateVariables {
    /// Build the variable set for a resolved status.
    ///
    /// `name` and `link` are already reconciled with the claim record and the
    /// directive's `link` argument.
    pub fn new(status: &StreamerStatus, name: &str, link: &str) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            values: vec![
                (ONLINE, if status.online { "1" } else { "0" }.to_string()),
                (NAME, name.to_owned()),
                (VIEWERS, status.viewers.to_string()),
                (DOING, text(&status.doing)),
                (STATUS, text(&status.status)),
                (LIFETIME_VIEWS, status.lifetime_views.to_string()),
                (FOLLOWERS, status.followers.to_string()),
                (LOGO, text(&status.logo)),
                (THUMBNAIL, text(&status.thumbnail)),
                (CHANNEL_URL, text(&status.channel_url)),
                (LINK, link.to_owned()),
            ],
        }
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| *k == placeholder)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Turns a template identifier and variables into markup.
pub trait Renderer: Send + Sync {
    /// `None` when the template is unknown to this renderer.
    fn render(&self, template: &str, variables: &TemplateVariables) -> Option<String>;
}

/// Escape text for use inside HTML content and single- or double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Plain placeholder substitution; placeholders without a value stay as they are.
pub fn substitute(template: &str, variables: &TemplateVariables) -> String {
    variables
        .iter()
        .fold(template.to_owned(), |acc, (placeholder, value)| {
            acc.replace(placeholder, &escape_html(value))
        })
}

/// Renderer for the built-in widget templates.
///
/// The markup keeps the host's `{{#if:}}` / `{{#ifeq:}}` conditionals; the host
/// engine expands them after substitution.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinRenderer;

impl BuiltinRenderer {
    fn template(name: &str) -> Option<&'static str> {
        let html = match name {
            "block" => {
                "<div class='stream block'>\
<div class='logo'><img src='{{#if:%THUMBNAIL%|%THUMBNAIL%|%LOGO%}}'/></div>\
<div class='stream_info'><div class='name'><a href='%LINK%'>%NAME%</a></div>\
<div class='online {{#ifeq:%ONLINE%|1|live|offline}}'><div class='dot'>{{#ifeq:%ONLINE%|1|Online|Offline}}</div></div></div>\
</div>"
            }
            "debug" => {
                "<pre class='stream debug'>\
online: %ONLINE%\nname: %NAME%\nviewers: %VIEWERS%\ndoing: %DOING%\nstatus: %STATUS%\n\
lifetime_views: %LIFETIME_VIEWS%\nfollowers: %FOLLOWERS%\nlogo: %LOGO%\n\
thumbnail: %THUMBNAIL%\nchannel_url: %CHANNEL_URL%\nlink: %LINK%\
</pre>"
            }
            "link" => "<a class='stream link' href='%LINK%'>%NAME%</a>",
            "live" => {
                "<div class='stream live'>\
<div class='stream_info'><div class='name'>%NAME%</div>\
<div class='online {{#ifeq:%ONLINE%|1|live|offline}}'><div class='dot'>{{#ifeq:%ONLINE%|1|Online|Offline}}</div></div></div>\
</div>"
            }
            "minilive" => {
                "<span class='stream minilive {{#ifeq:%ONLINE%|1|live|offline}}'><a href='%LINK%'>%NAME%</a></span>"
            }
            "thumbnail" => {
                "<div class='stream thumbnail'><a href='%LINK%'>\
<img src='{{#if:%THUMBNAIL%|%THUMBNAIL%|%LOGO%}}' alt='%NAME%'/></a></div>"
            }
            "viewers" => "<span class='stream viewers'>%VIEWERS%</span>",
            _ => return None,
        };
        Some(html)
    }
}

impl Renderer for BuiltinRenderer {
    fn render(&self, template: &str, variables: &TemplateVariables) -> Option<String> {
        Self::template(template).map(|html| substitute(html, variables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variables(online: bool) -> TemplateVariables {
        let status = StreamerStatus::builder("SomeChannel")
            .online(online)
            .viewers(12)
            .logo("https://cdn.example/logo.png")
            .channel_url("https://www.twitch.tv/somechannel")
            .build();
        TemplateVariables::new(&status, "SomeChannel", "https://www.twitch.tv/somechannel")
    }

    #[test]
    fn test_variables_cover_every_placeholder() {
        let vars = variables(false);
        let names: Vec<_> = vars.iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            vec![
                ONLINE,
                NAME,
                VIEWERS,
                DOING,
                STATUS,
                LIFETIME_VIEWS,
                FOLLOWERS,
                LOGO,
                THUMBNAIL,
                CHANNEL_URL,
                LINK
            ]
        );
        assert_eq!(vars.get(ONLINE), Some("0"));
        assert_eq!(vars.get(DOING), Some(""));
        assert_eq!(variables(true).get(ONLINE), Some("1"));
    }

    #[test]
    fn test_every_builtin_renders() {
        let vars = variables(true);
        for name in BUILT_IN_TEMPLATES {
            let html = BuiltinRenderer.render(name, &vars).unwrap();
            assert!(!html.contains("%NAME%"), "{name} left %NAME% unresolved");
            assert!(!html.contains("%LINK%"), "{name} left %LINK% unresolved");
        }
    }

    #[test]
    fn test_block_template() {
        let html = BuiltinRenderer.render("block", &variables(false)).unwrap();
        assert!(html.contains("<a href='https://www.twitch.tv/somechannel'>SomeChannel</a>"));
        assert!(html.contains("{{#ifeq:0|1|live|offline}}"));
        assert!(html.contains("{{#if:||https://cdn.example/logo.png}}"));
    }

    #[test]
    fn test_unknown_template() {
        assert!(BuiltinRenderer.render("Template:Custom", &variables(true)).is_none());
    }

    #[test]
    fn test_values_are_escaped() {
        let status = StreamerStatus::builder("x").build();
        let vars = TemplateVariables::new(&status, "<b>'quoted'</b>", "https://e.x/?a=1&b=2");
        let html = BuiltinRenderer.render("link", &vars).unwrap();
        assert_eq!(
            html,
            "<a class='stream link' href='https://e.x/?a=1&amp;b=2'>&lt;b&gt;&#039;quoted&#039;&lt;/b&gt;</a>"
        );
    }

    #[test]
    fn test_unresolved_placeholders_are_left() {
        let html = substitute("%NAME% %UNKNOWN%", &variables(true));
        assert_eq!(html, "SomeChannel %UNKNOWN%");
    }
}
