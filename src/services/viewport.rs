/// 视口填充触发器
///
/// 首屏结果不足一屏时不会产生滚动事件，需要主动请求更多页，
/// 直到内容填满视口或没有更多页为止。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportFill {
    content_extent: f64,
    viewport_extent: f64,
}

impl ViewportFill {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录最新的测量值，返回是否需要请求下一页
    pub fn measure(&mut self, content_extent: f64, viewport_extent: f64) -> bool {
        self.content_extent = content_extent;
        self.viewport_extent = viewport_extent;
        self.should_fill()
    }

    /// 列表被清空后内容高度归零，等待新的测量
    pub fn clear_content(&mut self) {
        self.content_extent = 0.0;
    }

    pub fn should_fill(&self) -> bool {
        self.content_extent > 0.0
            && self.viewport_extent > 0.0
            && self.content_extent < self.viewport_extent
    }

    pub fn content_extent(&self) -> f64 {
        self.content_extent
    }

    pub fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underfilled_viewport_triggers() {
        let mut fill = ViewportFill::new();
        assert!(fill.measure(400.0, 900.0));
    }

    #[test]
    fn test_filled_viewport_does_not_trigger() {
        let mut fill = ViewportFill::new();
        assert!(!fill.measure(1800.0, 900.0));
        assert!(!fill.measure(900.0, 900.0));
    }

    #[test]
    fn test_zero_measurements_do_not_trigger() {
        let mut fill = ViewportFill::new();
        assert!(!fill.measure(0.0, 900.0));
        assert!(!fill.measure(400.0, 0.0));
    }

    #[test]
    fn test_clear_content() {
        let mut fill = ViewportFill::new();
        fill.measure(400.0, 900.0);
        fill.clear_content();
        assert!(!fill.should_fill());
        assert_eq!(fill.viewport_extent(), 900.0);
    }
}
