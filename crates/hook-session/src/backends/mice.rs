//! Live source backed by the kernel's PS/2 mice multiplexer.
//!
//! Each 3-byte packet carries button bits and relative motion. Motion is
//! integrated into an absolute position clamped to the configured desktop,
//! and only right-button transitions are reported. The device cannot
//! distinguish injected input, so events from it are never synthetic.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Read;
use std::os::unix::fs::MetadataExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use waterflow_common::clock::MonotonicClock;
use waterflow_common::config::SourceConfig;
use waterflow_common::error::{WaterflowError, WaterflowResult};
use waterflow_gesture_model::event::{Point, PointerEvent, PointerKind};

use crate::PointerSource;

const RIGHT_BUTTON_MASK: u8 = 0b010;

pub struct MiceSource {
    device: std::fs::File,
    path: PathBuf,
    clock: MonotonicClock,
    tracker: PacketTracker,
}

impl MiceSource {
    /// Open the device, stamping events with `clock` so they line up with
    /// anything else sharing it (such as a trace header).
    pub fn new(config: &SourceConfig, clock: MonotonicClock) -> WaterflowResult<Self> {
        let tracker = PacketTracker::new(config.screen_width, config.screen_height)?;
        let device = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&config.device_path)
            .map_err(|e| {
                WaterflowError::input(format!(
                    "Failed to open {}: {e}",
                    config.device_path.display()
                ))
            })?;

        Ok(Self {
            device,
            path: config.device_path.clone(),
            clock,
            tracker,
        })
    }

    pub fn is_supported(path: &Path) -> bool {
        OpenOptions::new().read(true).open(path).is_ok()
    }

    fn ingest_packets(&mut self) -> WaterflowResult<()> {
        loop {
            let mut packet = [0u8; 3];
            match self.device.read(&mut packet) {
                Ok(3) => {
                    let now_ms = self.clock.now_ms();
                    self.tracker.process_packet(packet, now_ms);
                }
                Ok(_) => break,
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(err) => {
                    return Err(WaterflowError::input(format!(
                        "Failed reading {}: {err}",
                        self.path.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

impl PointerSource for MiceSource {
    fn poll(&mut self) -> WaterflowResult<Option<PointerEvent>> {
        if let Some(event) = self.tracker.pending.pop_front() {
            return Ok(Some(event));
        }

        self.ingest_packets()?;
        Ok(self.tracker.pending.pop_front())
    }

    fn name(&self) -> &str {
        "mice"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Turns raw packets into right-button pointer events.
struct PacketTracker {
    pending: VecDeque<PointerEvent>,
    position: Point,
    max_x: i32,
    max_y: i32,
    right_down: bool,
}

impl PacketTracker {
    fn new(width: u32, height: u32) -> WaterflowResult<Self> {
        let max_x = last_pixel(width, "width")?;
        let max_y = last_pixel(height, "height")?;
        Ok(Self {
            pending: VecDeque::new(),
            position: Point::new(max_x / 2, max_y / 2),
            max_x,
            max_y,
            right_down: false,
        })
    }

    fn process_packet(&mut self, packet: [u8; 3], now_ms: u64) {
        let dx = packet[1] as i8 as i32;
        let dy = packet[2] as i8 as i32;

        if dx != 0 || dy != 0 {
            // PS/2 reports upward motion as positive dy.
            self.position.x = (self.position.x + dx).clamp(0, self.max_x);
            self.position.y = (self.position.y - dy).clamp(0, self.max_y);
            self.push(PointerKind::Move, now_ms);
        }

        let right = packet[0] & RIGHT_BUTTON_MASK != 0;
        if right != self.right_down {
            self.right_down = right;
            let kind = if right {
                PointerKind::ButtonDown
            } else {
                PointerKind::ButtonUp
            };
            self.push(kind, now_ms);
        }
    }

    fn push(&mut self, kind: PointerKind, now_ms: u64) {
        self.pending.push_back(PointerEvent::new(
            kind,
            now_ms,
            self.position.x,
            self.position.y,
        ));
    }
}

/// Largest coordinate on an axis of `extent` pixels.
fn last_pixel(extent: u32, axis: &str) -> WaterflowResult<i32> {
    let extent = i32::try_from(extent)
        .ok()
        .filter(|extent| *extent > 0)
        .ok_or_else(|| {
            WaterflowError::config(format!("screen {axis} {extent} is not a usable extent"))
        })?;
    Ok(extent - 1)
}

pub(crate) fn device_diagnostic(path: &Path) -> String {
    let uid = unsafe { libc::geteuid() };
    let gid = unsafe { libc::getegid() };
    let shown = path.display();

    match std::fs::metadata(path) {
        Ok(meta) => {
            let mode = meta.mode() & 0o777;
            let owner = meta.uid();
            let group = meta.gid();
            format!(
                "device={shown} mode={mode:o} owner_uid={owner} owner_gid={group} process_uid={uid} process_gid={gid}; likely missing 'input' group membership. Fix: sudo usermod -aG input $USER && log out/in"
            )
        }
        Err(err) => format!(
            "device={shown} unavailable ({err}); ensure kernel input device exists and permissions allow read access"
        ),
    }
}
