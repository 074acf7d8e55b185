//! JavaScript evaluated inside the page
//!
//! Every probe the wait heuristics run is defined here so the Chrome session
//! and the scripted test session agree on exactly the same expressions.

/// True once the root content element exists
pub const BODY_PRESENT: &str = "document.body !== null";

/// Current scroll height of the body
pub const SCROLL_HEIGHT: &str = "document.body.scrollHeight";

/// Scroll to the very bottom
pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight)";

/// Scroll back to the top
pub const SCROLL_TO_TOP: &str = "window.scrollTo(0, 0)";

/// True when every image has finished loading with real content
pub const IMAGES_COMPLETE: &str = r#"
    Array.from(document.getElementsByTagName('img'))
        .every(img => img.complete && img.naturalHeight !== 0)
"#;

/// True when no known asynchronous request indicator reports activity
pub const AJAX_IDLE: &str = r#"
    (window.jQuery != null)
        ? window.jQuery.active === 0
        : document.readyState === 'complete'
"#;

/// Width and height metrics of both `body` and `documentElement`
pub const DOM_METRICS: &str = r#"
    ({
        bodyScrollWidth: document.body.scrollWidth,
        bodyOffsetWidth: document.body.offsetWidth,
        bodyClientWidth: document.body.clientWidth,
        rootScrollWidth: document.documentElement.scrollWidth,
        rootOffsetWidth: document.documentElement.offsetWidth,
        rootClientWidth: document.documentElement.clientWidth,
        bodyScrollHeight: document.body.scrollHeight,
        bodyOffsetHeight: document.body.offsetHeight,
        bodyClientHeight: document.body.clientHeight,
        rootScrollHeight: document.documentElement.scrollHeight,
        rootOffsetHeight: document.documentElement.offsetHeight,
        rootClientHeight: document.documentElement.clientHeight
    })
"#;

/// Title, final URL and user agent of the page
pub const PAGE_INFO: &str = r#"
    ({
        title: document.title,
        url: window.location.href,
        userAgent: navigator.userAgent
    })
"#;

/// Scroll to `fraction` of the current scroll height
pub fn scroll_to_fraction(fraction: f64) -> String {
    format!(
        "window.scrollTo(0, document.body.scrollHeight * {})",
        fraction
    )
}

/// Count body mutations over a window of `window_ms`, resolving to the count
pub fn mutation_count(window_ms: u64) -> String {
    format!(
        r#"
    new Promise(resolve => {{
        let changes = 0;
        const observer = new MutationObserver(records => {{
            changes += records.length;
        }});
        observer.observe(document.body, {{
            childList: true,
            subtree: true,
            attributes: true
        }});
        setTimeout(() => {{
            observer.disconnect();
            resolve(changes);
        }}, {});
    }})
"#,
        window_ms
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_to_fraction() {
        assert_eq!(
            scroll_to_fraction(0.3),
            "window.scrollTo(0, document.body.scrollHeight * 0.3)"
        );
    }

    #[test]
    fn test_mutation_count_embeds_window() {
        let script = mutation_count(1000);
        assert!(script.contains("}, 1000);"));
        assert!(script.contains("MutationObserver"));
    }
}
