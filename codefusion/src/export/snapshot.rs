//! Snapshot collaborators: turn staged ticket markup into a raster image.

use super::pdf::TextSpan;
use super::surface::StagedNode;
use crate::config::ExportConfig;
use crate::error::SnapshotError;
use crate::ticket::{AvatarDisplay, Ticket, TicketView};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// Rasterizes staged ticket markup.
pub trait TicketSnapshotter: Send + Sync {
    /// Capture the staged node.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the renderer fails or answers with
    /// something that is not an image.
    fn snapshot(
        &self,
        node: &StagedNode,
    ) -> impl Future<Output = Result<RgbImage, SnapshotError>> + Send;

    /// Text to print over the snapshot in the PDF.
    ///
    /// Empty for renderers that draw the markup text themselves.
    fn caption(&self, _view: &TicketView) -> Vec<TextSpan> {
        Vec::new()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest<'a> {
    html: &'a str,
    selector: &'static str,
    device_scale_factor: u8,
}

/// Posts the markup to an HTML render service and decodes the PNG reply.
#[derive(Debug, Clone)]
pub struct RenderServiceSnapshotter {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl RenderServiceSnapshotter {
    /// Create a snapshotter for the service at `url`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }
}

impl TicketSnapshotter for RenderServiceSnapshotter {
    async fn snapshot(&self, node: &StagedNode) -> Result<RgbImage, SnapshotError> {
        let request = RenderRequest {
            html: node.markup(),
            selector: "#ticket-card",
            device_scale_factor: 2,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SnapshotError::Timeout(self.timeout)
                } else {
                    SnapshotError::Renderer(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SnapshotError::Renderer(format!("render service answered {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SnapshotError::Renderer(e.to_string()))?;
        let image = image::load_from_memory(&bytes).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "Render service returned ticket snapshot"
        );
        Ok(image.to_rgb8())
    }
}

const CARD_WIDTH: u32 = 600;
const CARD_HEIGHT: u32 = 340;
const AVATAR_SIZE: u32 = 96;
const BACKGROUND: Rgb<u8> = Rgb([15, 23, 42]);
const HEADER: Rgb<u8> = Rgb([37, 99, 235]);
const ACCENT: Rgb<u8> = Rgb([226, 232, 240]);

/// Draws a plain ticket card without a browser engine.
///
/// The raster holds the header band, the circular avatar (a solid disc when
/// there is no photo) and a stripe pattern derived from the ticket number.
/// The ticket text, including the initials on the disc, comes from
/// [`TicketSnapshotter::caption`] and is printed by the PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardSnapshotter;

impl TicketSnapshotter for CardSnapshotter {
    async fn snapshot(&self, node: &StagedNode) -> Result<RgbImage, SnapshotError> {
        let ticket = node.ticket().clone();
        tokio::task::spawn_blocking(move || draw_card(&ticket))
            .await
            .map_err(|e| SnapshotError::Renderer(e.to_string()))
    }

    fn caption(&self, view: &TicketView) -> Vec<TextSpan> {
        card_caption(view)
    }
}

/// Text laid out over the card drawn by [`draw_card`].
fn card_caption(view: &TicketView) -> Vec<TextSpan> {
    let t = &view.ticket;
    let mut spans = vec![
        TextSpan::bold(32, 42, 22, "CodeFusion 2025"),
        TextSpan::bold(400, 40, 14, format!("Ticket No {}", t.id)),
        TextSpan::bold(160, 116, 20, t.name.clone()),
        TextSpan::new(160, 138, 13, t.profession.clone()),
        TextSpan::new(160, 158, 12, t.email.clone()),
    ];

    if let AvatarDisplay::Initials { text } = &view.avatar {
        // Helvetica-Bold capitals are roughly 0.72 em wide.
        let half_width = u32::try_from(text.chars().count()).unwrap_or(2) * 23 / 2;
        let centre = 32 + AVATAR_SIZE / 2;
        spans.push(TextSpan::bold(
            centre.saturating_sub(half_width),
            96 + AVATAR_SIZE / 2 + 11,
            32,
            text.clone(),
        ));
    }

    for (row, day) in (0_u32..).zip(view.days.iter().take(3)) {
        spans.push(TextSpan::new(
            160,
            182 + row * 16,
            12,
            format!("{} \u{b7} {}", day.date_label, day.theme),
        ));
    }

    spans.push(TextSpan::new(
        160,
        246,
        11,
        format!("{}, {}", view.dates_label, view.venue),
    ));
    spans.push(TextSpan::new(
        32,
        226,
        11,
        format!("Issued {}", t.issued_date.format("%Y-%m-%d")),
    ));
    spans
}

fn draw_card(ticket: &Ticket) -> RgbImage {
    let mut card = RgbImage::from_pixel(CARD_WIDTH, CARD_HEIGHT, BACKGROUND);

    for y in 0..64 {
        for x in 0..CARD_WIDTH {
            card.put_pixel(x, y, HEADER);
        }
    }

    let avatar = ticket.avatar.as_deref().and_then(decode_avatar);
    let (left, top) = (32, 96);
    let radius = f64::from(AVATAR_SIZE) / 2.0;
    for y in 0..AVATAR_SIZE {
        for x in 0..AVATAR_SIZE {
            let dx = f64::from(x) + 0.5 - radius;
            let dy = f64::from(y) + 0.5 - radius;
            if dx.hypot(dy) > radius {
                continue;
            }
            let pixel = avatar.as_ref().map_or(HEADER, |img| *img.get_pixel(x, y));
            card.put_pixel(left + x, top + y, pixel);
        }
    }

    // One stripe per ticket-number byte along the bottom edge.
    let mut x = 160;
    for byte in ticket.id.bytes() {
        let width = 2 + u32::from(byte % 5);
        for dx in 0..width {
            for y in 260..316 {
                if x + dx < CARD_WIDTH - 32 {
                    card.put_pixel(x + dx, y, ACCENT);
                }
            }
        }
        x += width + 3;
    }

    card
}

fn decode_avatar(data_uri: &str) -> Option<RgbImage> {
    let (_, payload) = data_uri.split_once(";base64,")?;
    let bytes = match STANDARD.decode(payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "Avatar is not valid base64");
            return None;
        },
    };
    match image::load_from_memory(&bytes) {
        Ok(img) => Some(imageops::resize(
            &img.to_rgb8(),
            AVATAR_SIZE,
            AVATAR_SIZE,
            FilterType::Triangle,
        )),
        Err(e) => {
            tracing::debug!(error = %e, "Avatar is not a decodable image");
            None
        },
    }
}

/// Snapshotter selected from configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredSnapshotter {
    /// Remote HTML render service
    RenderService(RenderServiceSnapshotter),
    /// Local card drawing
    Card(CardSnapshotter),
}

impl ConfiguredSnapshotter {
    /// Pick the snapshotter for `config`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn from_config(config: &ExportConfig) -> Result<Self, reqwest::Error> {
        match &config.render_service_url {
            Some(url) => Ok(Self::RenderService(RenderServiceSnapshotter::new(
                url.clone(),
                config.snapshot_timeout(),
            )?)),
            None => Ok(Self::Card(CardSnapshotter)),
        }
    }

    /// Whether ticket markup is rendered by a browser engine.
    #[must_use]
    pub const fn renders_markup(&self) -> bool {
        matches!(self, Self::RenderService(_))
    }
}

impl TicketSnapshotter for ConfiguredSnapshotter {
    async fn snapshot(&self, node: &StagedNode) -> Result<RgbImage, SnapshotError> {
        match self {
            Self::RenderService(s) => s.snapshot(node).await,
            Self::Card(s) => s.snapshot(node).await,
        }
    }

    fn caption(&self, view: &TicketView) -> Vec<TextSpan> {
        match self {
            Self::RenderService(s) => s.caption(view),
            Self::Card(s) => s.caption(view),
        }
    }
}
