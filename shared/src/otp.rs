/// OTP 重发倒计时，由 1 秒间隔的定时器驱动
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResendCountdown {
    total: u32,
    remaining: u32,
}

impl ResendCountdown {
    pub const DEFAULT_SECS: u32 = 60;

    pub fn new(total: u32) -> Self {
        Self {
            total,
            remaining: total,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// 走一秒，到 0 后停止
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn can_resend(&self) -> bool {
        self.remaining == 0
    }

    /// 重发成功后重新开始倒计时；未到 0 时返回 false
    pub fn restart(&mut self) -> bool {
        if !self.can_resend() {
            return false;
        }
        self.remaining = self.total;
        true
    }
}

impl Default for ResendCountdown {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_reaches_zero_and_stops() {
        let mut countdown = ResendCountdown::new(3);
        assert!(!countdown.can_resend());
        for _ in 0..5 {
            countdown.tick();
        }
        assert_eq!(countdown.remaining(), 0);
        assert!(countdown.can_resend());
    }

    #[test]
    fn test_restart_only_at_zero() {
        let mut countdown = ResendCountdown::default();
        assert!(!countdown.restart());
        for _ in 0..60 {
            countdown.tick();
        }
        assert!(countdown.restart());
        assert_eq!(countdown.remaining(), 60);
    }
}
