//! Farcaster Frame documents.
//!
//! A frame is an HTML page whose `<meta>` tags describe one image and its
//! buttons. Clients read the tags and never render the body, so the bodies
//! here are plain fallbacks for browsers.

use ethers::types::U256;
use std::fmt::Write;

use super::state_formatter::format_units_trimmed;
use crate::constants::{FRAME_VERSION, USDC_DECIMALS};

const ASPECT_RATIO: &str = "1.91:1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Post,
    Link,
    Tx,
}

impl ButtonAction {
    fn as_str(self) -> &'static str {
        match self {
            ButtonAction::Post => "post",
            ButtonAction::Link => "link",
            ButtonAction::Tx => "tx",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameButton {
    pub label: String,
    pub action: ButtonAction,
    pub target: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub title: String,
    pub image: String,
    pub buttons: Vec<FrameButton>,
    pub post_url: Option<String>,
    pub body: String,
}

/// Escapes text for use inside an HTML attribute or element.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// Internal helper that writes one `<meta property=... content=...>` line.
fn meta(html: &mut String, property: &str, content: &str) {
    let _ = writeln!(
        html,
        r#"    <meta property="{}" content="{}" />"#,
        property,
        escape_html(content)
    );
}

impl Frame {
    pub fn render(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n  <head>\n");
        html.push_str("    <meta charset=\"utf-8\" />\n");
        let _ = writeln!(html, "    <title>{}</title>", escape_html(&self.title));
        meta(&mut html, "fc:frame", FRAME_VERSION);
        meta(&mut html, "fc:frame:image", &self.image);
        meta(&mut html, "fc:frame:image:aspect_ratio", ASPECT_RATIO);
        meta(&mut html, "og:image", &self.image);
        meta(&mut html, "og:title", &self.title);

        for (index, button) in self.buttons.iter().enumerate() {
            let prefix = format!("fc:frame:button:{}", index + 1);
            meta(&mut html, &prefix, &button.label);
            meta(&mut html, &format!("{}:action", prefix), button.action.as_str());
            if let Some(target) = &button.target {
                meta(&mut html, &format!("{}:target", prefix), target);
            }
        }

        if let Some(post_url) = &self.post_url {
            meta(&mut html, "fc:frame:post_url", post_url);
        }

        html.push_str("  </head>\n  <body>\n");
        let _ = writeln!(html, "    {}", self.body);
        html.push_str("  </body>\n</html>\n");
        html
    }
}

/// Dollar label for an amount of USDC base units: at least two decimals and
/// no rounding, so `1000000` is `"1.00"` and `1005000` is `"1.005"`.
pub fn usdc_fee_label(units: u64) -> String {
    let amount = format_units_trimmed(U256::from(units), USDC_DECIMALS);
    match amount.split_once('.') {
        Some((whole, frac)) if frac.len() < 2 => format!("{}.{:0<2}", whole, frac),
        _ => amount,
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Sends a paid user on to the game.
pub fn redirect_frame(image: &str, target: &str) -> String {
    Frame {
        title: "Donut Miner".to_string(),
        image: image.to_string(),
        buttons: vec![FrameButton {
            label: "Launch Game".to_string(),
            action: ButtonAction::Link,
            target: Some(target.to_string()),
        }],
        post_url: None,
        body: "<p>Payment verified. Launch the game to start mining.</p>".to_string(),
    }
    .render()
}

/// Entry fee frame: a `tx` button fetching the transfer from `/api/pay`.
pub fn payment_frame(image: &str, public_url: &str, fee_usdc: &str) -> String {
    Frame {
        title: "Donut Miner".to_string(),
        image: image.to_string(),
        buttons: vec![FrameButton {
            label: format!("Pay ${} USDC to Play", fee_usdc),
            action: ButtonAction::Tx,
            target: Some(join_url(public_url, "/api/pay")),
        }],
        post_url: Some(join_url(public_url, "/api/verify")),
        body: format!("<p>Pay {} USDC to unlock the game.</p>", escape_html(fee_usdc)),
    }
    .render()
}

pub fn retry_frame(image: &str, public_url: &str) -> String {
    Frame {
        title: "Donut Miner".to_string(),
        image: image.to_string(),
        buttons: vec![FrameButton {
            label: "Retry Payment".to_string(),
            action: ButtonAction::Post,
            target: None,
        }],
        post_url: Some(join_url(public_url, "/api/index")),
        body: "<p>Payment could not be verified.</p>".to_string(),
    }
    .render()
}

pub fn blaze_success_frame(image: &str, game_url: &str, tx_id: Option<&str>) -> String {
    let tx_line = match tx_id {
        Some(tx_id) => format!("Transaction: {}", escape_html(tx_id)),
        None => "Transaction submitted.".to_string(),
    };
    Frame {
        title: "Glazed!".to_string(),
        image: image.to_string(),
        buttons: vec![FrameButton {
            label: "Back to Game".to_string(),
            action: ButtonAction::Link,
            target: Some(game_url.to_string()),
        }],
        post_url: None,
        body: format!("<h1>You're the miner now!</h1>\n    <p>{}</p>", tx_line),
    }
    .render()
}

/// Standalone page that offers `mine` as a frame transaction.
pub fn payment_page(image: &str, public_url: &str) -> String {
    Frame {
        title: "Donut Miner: Glaze".to_string(),
        image: image.to_string(),
        buttons: vec![FrameButton {
            label: "Glaze".to_string(),
            action: ButtonAction::Tx,
            target: Some(join_url(public_url, "/api/transaction")),
        }],
        post_url: Some(join_url(public_url, "/api/verify")),
        body: "<h1>Donut Miner</h1>\n    <p>Become the miner by paying the current price. \
               Open this page in a Farcaster client to sign the transaction.</p>"
            .to_string(),
    }
    .render()
}
