use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use prometheus::IntCounter;
use sdp::{encode_command, HeatCommand};

use crate::{
    board::BoardLink,
    error::{Error, Result},
};

/// How long the "packet sent" indicator stays up.
pub const INDICATOR_HOLD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// The board has not been heard from yet; nothing went out.
    TargetUnknown,
}

/// Sends heat-map control commands to the configured chips.
#[derive(Debug)]
pub struct CommandSender {
    board: Arc<BoardLink>,
    x_chips: usize,
    chips: Vec<usize>,
    last: Mutex<Option<(Instant, SendOutcome)>>,
    stopped: AtomicBool,
    sent: Option<IntCounter>,
}

impl CommandSender {
    pub fn new(board: Arc<BoardLink>, x_chips: usize, chips: Vec<usize>) -> Self {
        Self {
            board,
            x_chips: x_chips.max(1),
            chips,
            last: Mutex::new(None),
            stopped: AtomicBool::new(false),
            sent: None,
        }
    }

    pub fn with_counter(mut self, sent: IntCounter) -> Self {
        self.sent = Some(sent);
        self
    }

    /// Packs a logical chip id as `256 * x + y`.
    pub fn chip_address(&self, chip: usize) -> u16 {
        let (x, y) = (chip / self.x_chips, chip % self.x_chips);
        (256 * x + y) as u16
    }

    pub fn stop(&self) -> Result<SendOutcome> {
        self.send(HeatCommand::Stop, [0.0; 4])
    }

    /// Sets the edge temperatures on every control chip.
    pub fn set(&self, north: f32, east: f32, south: f32, west: f32) -> Result<SendOutcome> {
        self.send(HeatCommand::Set, [north, east, south, west])
    }

    pub fn pause(&self) -> Result<SendOutcome> {
        self.send(HeatCommand::Pause, [0.0; 4])
    }

    pub fn resume(&self) -> Result<SendOutcome> {
        self.send(HeatCommand::Resume, [0.0; 4])
    }

    /// Sends `stop` once, on shutdown, if the board ever reported in.
    pub fn stop_once(&self) -> Result<Option<SendOutcome>> {
        if !self.board.port_known() || self.stopped.swap(true, Ordering::AcqRel) {
            return Ok(None);
        }
        self.stop().map(Some)
    }

    fn send(&self, command: HeatCommand, edges: [f32; 4]) -> Result<SendOutcome> {
        let mut outcome = SendOutcome::TargetUnknown;
        for &chip in &self.chips {
            let packet = encode_command(self.chip_address(chip), command, edges);
            if self.board.send(&packet).map_err(Error::Send)? {
                outcome = SendOutcome::Sent;
                if let Some(c) = &self.sent {
                    c.inc();
                }
            }
        }
        tracing::debug!(?command, ?outcome, chips = self.chips.len(), "control command");
        *self.last.lock() = Some((Instant::now(), outcome));
        Ok(outcome)
    }

    /// Outcome of the last command if it is recent enough to show.
    pub fn indicator(&self, now: Instant) -> Option<SendOutcome> {
        let (at, outcome) = (*self.last.lock())?;
        (now.saturating_duration_since(at) < INDICATOR_HOLD).then_some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdp::{SdpHeader, HEADER_LEN};
    use std::net::UdpSocket;

    fn board() -> (UdpSocket, Arc<BoardLink>) {
        let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
        sock.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let link = Arc::new(BoardLink::new(None));
        link.observe(sock.local_addr().unwrap()).unwrap();
        (sock, link)
    }

    #[test]
    fn chip_address_packs_x_and_y() {
        let s = CommandSender::new(Arc::new(BoardLink::new(None)), 8, vec![1]);
        assert_eq!(s.chip_address(1), 1);
        assert_eq!(s.chip_address(8), 256);
        assert_eq!(s.chip_address(19), 2 * 256 + 3);
    }

    #[test]
    fn unknown_target_is_reported_not_sent() {
        let s = CommandSender::new(Arc::new(BoardLink::new(None)), 8, vec![1]);
        assert_eq!(s.pause().unwrap(), SendOutcome::TargetUnknown);
        assert_eq!(s.indicator(Instant::now()), Some(SendOutcome::TargetUnknown));
        assert_eq!(s.stop_once().unwrap(), None);
    }

    #[test]
    fn set_reaches_the_board_in_16_16() {
        let (sock, link) = board();
        let s = CommandSender::new(link, 8, vec![9]);
        assert_eq!(s.set(2.5, 10.0, 10.0, 40.0).unwrap(), SendOutcome::Sent);

        let mut buf = [0u8; 128];
        let n = sock.recv(&mut buf).unwrap();
        let h = SdpHeader::decode(&buf[..n]).unwrap();
        assert_eq!(h.dest_addr, 256 + 1);
        assert_eq!(h.command, HeatCommand::Set.code());
        let north = u32::from_le_bytes(buf[HEADER_LEN..HEADER_LEN + 4].try_into().unwrap());
        assert_eq!(north, 163840);
    }

    #[test]
    fn indicator_expires_after_a_second() {
        let (_sock, link) = board();
        let s = CommandSender::new(link, 8, vec![1]);
        assert_eq!(s.indicator(Instant::now()), None);
        s.resume().unwrap();
        let now = Instant::now();
        assert_eq!(s.indicator(now), Some(SendOutcome::Sent));
        assert_eq!(s.indicator(now + Duration::from_millis(1500)), None);
    }

    #[test]
    fn stop_is_sent_once() {
        let (sock, link) = board();
        let s = CommandSender::new(link, 8, vec![1]);
        assert_eq!(s.stop_once().unwrap(), Some(SendOutcome::Sent));
        assert_eq!(s.stop_once().unwrap(), None);
        let mut buf = [0u8; 128];
        let n = sock.recv(&mut buf).unwrap();
        assert_eq!(SdpHeader::decode(&buf[..n]).unwrap().command, 0);
    }
}
