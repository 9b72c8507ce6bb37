//! Capture option types and their wire projections.
//!
//! This module contains the request-side model of the ScreenCraft API:
//!
//! - [`ScreenshotOptions`] - body of `POST /screenshots`
//! - [`PdfOptions`] - body of `POST /pdfs`
//! - [`Viewport`], [`Clip`], [`Cookie`], [`WebhookConfig`], [`PdfMargins`]
//!
//! Field names serialize as camelCase (`fullPage`, `waitUntil`,
//! `deviceScaleFactor`, ...). Optional fields that are unset are omitted from
//! the payload so the backend can apply its own defaults.
//!
//! # Example
//!
//! ```rust
//! use screencraft::types::{ImageFormat, ScreenshotOptions, WaitUntil};
//!
//! let options = ScreenshotOptions::new("https://example.com")
//!     .with_format(ImageFormat::Jpeg)
//!     .with_quality(90)
//!     .with_full_page(true)
//!     .with_wait_until(WaitUntil::NetworkIdle0)
//!     .with_hide_selector(".cookie-banner");
//!
//! let payload = serde_json::to_value(&options).unwrap();
//! assert_eq!(payload["fullPage"], true);
//! assert!(payload.get("viewport").is_none());
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Image format for screenshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

/// Paper format for PDF generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PdfFormat {
    A0,
    A1,
    A2,
    A3,
    #[default]
    A4,
    A5,
    A6,
    Letter,
    Legal,
    Tabloid,
}

/// Page lifecycle event to wait for before capturing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    #[default]
    Load,
    DomContentLoaded,
    /// No network connections for 500ms
    NetworkIdle0,
    /// At most two network connections for 500ms
    NetworkIdle2,
}

/// Where to scroll the page before capturing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollPosition {
    Top,
    Bottom,
}

/// Cookie `SameSite` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// Browser viewport used for rendering.
///
/// Use [`crate::presets`] for the named device configurations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
    pub is_mobile: bool,
    pub has_touch: bool,
    pub is_landscape: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl Viewport {
    /// Desktop-style viewport of the given size
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            device_scale_factor: 1.0,
            is_mobile: false,
            has_touch: false,
            is_landscape: true,
        }
    }

    /// Set the device pixel ratio
    pub fn with_device_scale_factor(mut self, factor: f64) -> Self {
        self.device_scale_factor = factor;
        self
    }

    /// Emulate a touch-enabled mobile device
    pub fn mobile(mut self) -> Self {
        self.is_mobile = true;
        self.has_touch = true;
        self
    }

    /// Set the orientation flag
    pub fn with_landscape(mut self, landscape: bool) -> Self {
        self.is_landscape = landscape;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::validation(
                "viewport width and height must be greater than zero",
                "viewport",
            ));
        }
        Ok(())
    }
}

/// Rectangular region to capture instead of the whole viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Clip {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Cookie set in the browser before navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
    /// Expiry as a Unix timestamp in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
}

impl Cookie {
    /// Cookie with path `/` and no other attributes
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: "/".to_string(),
            secure: false,
            http_only: false,
            same_site: None,
            expires: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn with_expires(mut self, expires: i64) -> Self {
        self.expires = Some(expires);
        self
    }
}

/// Webhook delivery target.
///
/// `retry_count` and `timeout` tell the backend how to deliver the callback;
/// they are unrelated to the client's own [`RetryConfig`](crate::retry::RetryConfig).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Shared secret the backend uses to sign deliveries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub retry_count: u32,
    /// Delivery timeout in seconds
    pub timeout: u32,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: None,
            secret: None,
            retry_count: 3,
            timeout: 30,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout = timeout_secs;
        self
    }
}

/// Options for `POST /screenshots`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotOptions {
    pub url: String,
    pub format: ImageFormat,
    /// 1-100, only meaningful for jpeg/webp
    pub quality: u8,
    pub full_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    /// Named preset resolved into `viewport` by the client before sending
    #[serde(skip)]
    pub viewport_preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<Clip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_position: Option<ScrollPosition>,
    /// Dismiss cookie consent banners
    pub accept_cookies: bool,
    /// Milliseconds to wait after load before capturing
    pub delay: u64,
    pub wait_until: WaitUntil,
    /// Navigation timeout in milliseconds
    pub timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<Cookie>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub bypass_csp: bool,
    pub javascript_enabled: bool,
    pub dark_mode: bool,
    pub block_ads: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_selectors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookConfig>,
}

impl ScreenshotOptions {
    /// Screenshot of `url` with the service defaults
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: ImageFormat::Png,
            quality: 80,
            full_page: false,
            viewport: None,
            viewport_preset: None,
            clip: None,
            scroll_position: None,
            accept_cookies: false,
            delay: 0,
            wait_until: WaitUntil::Load,
            timeout: 30_000,
            cookies: None,
            headers: None,
            user_agent: None,
            bypass_csp: false,
            javascript_enabled: true,
            dark_mode: false,
            block_ads: false,
            hide_selectors: None,
            click_selector: None,
            wait_for_selector: None,
            webhook: None,
        }
    }

    /// Full scrollable page as PNG
    pub fn full_page(url: impl Into<String>) -> Self {
        Self::new(url).with_full_page(true)
    }

    /// Phone-sized capture using the `mobile` preset
    pub fn mobile(url: impl Into<String>) -> Self {
        Self::new(url).with_viewport(crate::presets::MOBILE)
    }

    /// 1920x1080 desktop capture
    pub fn desktop(url: impl Into<String>) -> Self {
        Self::new(url).with_viewport(crate::presets::DESKTOP)
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_full_page(mut self, full_page: bool) -> Self {
        self.full_page = full_page;
        self
    }

    /// Use an explicit viewport, clearing any preset name
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self.viewport_preset = None;
        self
    }

    /// Use a named preset such as `"mobile"` or `"ipad_pro"`.
    ///
    /// The name is checked when the request is sent; unknown names fail with
    /// [`Error::Validation`] listing the valid ones.
    pub fn with_viewport_preset(mut self, name: impl Into<String>) -> Self {
        self.viewport_preset = Some(name.into());
        self.viewport = None;
        self
    }

    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn with_scroll_position(mut self, position: ScrollPosition) -> Self {
        self.scroll_position = Some(position);
        self
    }

    pub fn with_accept_cookies(mut self, accept: bool) -> Self {
        self.accept_cookies = accept;
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay = delay_ms;
        self
    }

    pub fn with_wait_until(mut self, wait_until: WaitUntil) -> Self {
        self.wait_until = wait_until;
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = timeout_ms;
        self
    }

    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.get_or_insert_with(Vec::new).push(cookie);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_bypass_csp(mut self, bypass: bool) -> Self {
        self.bypass_csp = bypass;
        self
    }

    pub fn with_javascript(mut self, enabled: bool) -> Self {
        self.javascript_enabled = enabled;
        self
    }

    pub fn with_dark_mode(mut self, dark_mode: bool) -> Self {
        self.dark_mode = dark_mode;
        self
    }

    pub fn with_block_ads(mut self, block_ads: bool) -> Self {
        self.block_ads = block_ads;
        self
    }

    pub fn with_hide_selector(mut self, selector: impl Into<String>) -> Self {
        self.hide_selectors
            .get_or_insert_with(Vec::new)
            .push(selector.into());
        self
    }

    pub fn with_click_selector(mut self, selector: impl Into<String>) -> Self {
        self.click_selector = Some(selector.into());
        self
    }

    pub fn with_wait_for_selector(mut self, selector: impl Into<String>) -> Self {
        self.wait_for_selector = Some(selector.into());
        self
    }

    pub fn with_webhook(mut self, webhook: WebhookConfig) -> Self {
        self.webhook = Some(webhook);
        self
    }

    /// Replace a preset name with the concrete viewport it names.
    pub fn resolve_viewport_preset(mut self) -> Result<Self> {
        if let Some(name) = self.viewport_preset.take() {
            self.viewport = Some(crate::presets::viewport_preset(&name)?);
        }
        Ok(self)
    }

    /// Check the options locally before any request is made.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::validation("url is required", "url"));
        }
        if self.quality > 100 {
            return Err(Error::validation(
                format!("quality must be between 0 and 100, got {}", self.quality),
                "quality",
            ));
        }
        if let Some(viewport) = &self.viewport {
            viewport.validate()?;
        }
        Ok(())
    }
}

/// PDF page margins as CSS lengths (`"1cm"`, `"0.5in"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfMargins {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl Default for PdfMargins {
    fn default() -> Self {
        Self::uniform("0")
    }
}

impl PdfMargins {
    /// Same margin on all four sides
    pub fn uniform(margin: impl Into<String>) -> Self {
        let margin = margin.into();
        Self {
            top: margin.clone(),
            right: margin.clone(),
            bottom: margin.clone(),
            left: margin,
        }
    }
}

/// Options for `POST /pdfs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfOptions {
    pub url: String,
    pub format: PdfFormat,
    pub landscape: bool,
    pub print_background: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins: Option<PdfMargins>,
    /// Rendering scale, 0.1 to 2.0
    pub scale: f64,
    /// Pages to print, e.g. `"1-5, 8, 11-13"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_ranges: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_template: Option<String>,
    pub display_header_footer: bool,
    pub prefer_css_page_size: bool,
    pub accept_cookies: bool,
    pub delay: u64,
    pub wait_until: WaitUntil,
    pub timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<Cookie>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub javascript_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookConfig>,
}

impl PdfOptions {
    /// A4 portrait PDF of `url` with backgrounds printed
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: PdfFormat::A4,
            landscape: false,
            print_background: true,
            margins: None,
            scale: 1.0,
            page_ranges: None,
            header_template: None,
            footer_template: None,
            display_header_footer: false,
            prefer_css_page_size: false,
            accept_cookies: false,
            delay: 0,
            wait_until: WaitUntil::Load,
            timeout: 30_000,
            cookies: None,
            headers: None,
            user_agent: None,
            javascript_enabled: true,
            wait_for_selector: None,
            webhook: None,
        }
    }

    pub fn a4(url: impl Into<String>) -> Self {
        Self::new(url)
    }

    pub fn letter(url: impl Into<String>) -> Self {
        Self::new(url).with_format(PdfFormat::Letter)
    }

    pub fn landscape(url: impl Into<String>, format: PdfFormat) -> Self {
        Self::new(url).with_format(format).with_landscape(true)
    }

    pub fn with_format(mut self, format: PdfFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_landscape(mut self, landscape: bool) -> Self {
        self.landscape = landscape;
        self
    }

    pub fn with_print_background(mut self, print_background: bool) -> Self {
        self.print_background = print_background;
        self
    }

    pub fn with_margins(mut self, margins: PdfMargins) -> Self {
        self.margins = Some(margins);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_page_ranges(mut self, ranges: impl Into<String>) -> Self {
        self.page_ranges = Some(ranges.into());
        self
    }

    /// Set header and footer HTML and turn on their display
    pub fn with_header_footer(
        mut self,
        header_html: impl Into<String>,
        footer_html: impl Into<String>,
    ) -> Self {
        self.header_template = Some(header_html.into());
        self.footer_template = Some(footer_html.into());
        self.display_header_footer = true;
        self
    }

    pub fn with_prefer_css_page_size(mut self, prefer: bool) -> Self {
        self.prefer_css_page_size = prefer;
        self
    }

    pub fn with_accept_cookies(mut self, accept: bool) -> Self {
        self.accept_cookies = accept;
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay = delay_ms;
        self
    }

    pub fn with_wait_until(mut self, wait_until: WaitUntil) -> Self {
        self.wait_until = wait_until;
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = timeout_ms;
        self
    }

    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.get_or_insert_with(Vec::new).push(cookie);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_javascript(mut self, enabled: bool) -> Self {
        self.javascript_enabled = enabled;
        self
    }

    pub fn with_wait_for_selector(mut self, selector: impl Into<String>) -> Self {
        self.wait_for_selector = Some(selector.into());
        self
    }

    pub fn with_webhook(mut self, webhook: WebhookConfig) -> Self {
        self.webhook = Some(webhook);
        self
    }

    /// Check the options locally before any request is made.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::validation("url is required", "url"));
        }
        if !(0.1..=2.0).contains(&self.scale) {
            return Err(Error::validation(
                format!("scale must be between 0.1 and 2.0, got {}", self.scale),
                "scale",
            ));
        }
        Ok(())
    }
}
