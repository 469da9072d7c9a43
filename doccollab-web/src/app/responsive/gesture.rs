/// Recognizes a horizontal swipe to the left between `touchstart` and `touchend`.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeDetector {
    threshold: f64,
    start: Option<(f64, f64)>,
}

impl SwipeDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start: None,
        }
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    /// Consumes the recorded start point. A touchend without a start is ignored.
    pub fn touch_end(&mut self, x: f64, y: f64) -> bool {
        let Some((start_x, start_y)) = self.start.take() else {
            return false;
        };

        let dx = start_x - x;
        let dy = start_y - y;

        dx.abs() > dy.abs() && dx > self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_swipe() {
        let mut swipe = SwipeDetector::new(50.0);
        swipe.touch_start(300.0, 100.0);
        assert!(swipe.touch_end(200.0, 110.0));
    }

    #[test]
    fn short_or_vertical_moves_are_not_swipes() {
        let mut swipe = SwipeDetector::new(50.0);

        swipe.touch_start(300.0, 100.0);
        assert!(!swipe.touch_end(260.0, 100.0));

        swipe.touch_start(300.0, 100.0);
        assert!(!swipe.touch_end(220.0, 300.0));

        swipe.touch_start(100.0, 100.0);
        assert!(!swipe.touch_end(300.0, 100.0));
    }

    #[test]
    fn start_on_the_top_edge_counts() {
        let mut swipe = SwipeDetector::new(50.0);
        swipe.touch_start(120.0, 0.0);
        assert!(swipe.touch_end(20.0, 0.0));
    }

    #[test]
    fn threshold_change_applies_to_pending_gesture() {
        let mut swipe = SwipeDetector::new(50.0);
        swipe.touch_start(300.0, 100.0);
        swipe.set_threshold(120.0);
        assert!(!swipe.touch_end(200.0, 100.0));

        swipe.touch_start(300.0, 100.0);
        swipe.set_threshold(80.0);
        assert!(swipe.touch_end(200.0, 100.0));
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut swipe = SwipeDetector::new(50.0);
        assert!(!swipe.touch_end(0.0, 0.0));

        swipe.touch_start(200.0, 0.0);
        assert!(swipe.touch_end(100.0, 0.0));
        assert!(!swipe.touch_end(0.0, 0.0));
    }
}
