use super::*;

// Geometry is declared by the test, never computed: the runtime does no layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutBox {
    pub top: i64,
    pub height: i64,
    pub scroll_width: i64,
    pub client_width: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    IntoView {
        target: NodeId,
        smooth: bool,
    },
    By {
        container: NodeId,
        delta_x: i64,
        smooth: bool,
    },
    WindowTo {
        y: i64,
        smooth: bool,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ViewportState {
    pub(crate) scroll_y: i64,
    pub(crate) height: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct IntersectionWatch {
    pub(crate) target: NodeId,
    pub(crate) threshold: f64,
    // None until the first observation is delivered.
    pub(crate) intersecting: Option<bool>,
}

impl Page {
    pub fn set_layout(&mut self, selector: &str, layout: LayoutBox) -> Result<()> {
        let target = self.select_one(selector)?;
        self.layout.insert(target, layout);
        if self.trace {
            let label = self.trace_node_label(target);
            self.trace_line(format!(
                "[layout] {label} top={} height={} scroll_width={} client_width={}",
                layout.top, layout.height, layout.scroll_width, layout.client_width
            ));
        }
        self.deliver_observations()
    }

    pub fn set_viewport_height(&mut self, height: i64) -> Result<()> {
        self.viewport.height = height.max(0);
        self.trace_line(format!("[layout] viewport height={}", self.viewport.height));
        self.deliver_observations()
    }

    pub fn scroll_window_to(&mut self, y: i64) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            self.move_window_to(y, "driver");
            self.deliver_observations()
        })
    }

    pub fn window_scroll_y(&self) -> i64 {
        self.viewport.scroll_y
    }

    pub fn scroll_left(&self, selector: &str) -> Result<i64> {
        let target = self.select_one(selector)?;
        self.dom.scroll_left(target)
    }

    pub fn set_intersection_observer_supported(&mut self, supported: bool) {
        self.observer_supported = supported;
    }

    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.scroll_requests)
    }

    pub(crate) fn record_scroll_request(&mut self, request: ScrollRequest) {
        self.trace_line(format!("[scroll] request {request:?}"));
        self.scroll_requests.push(request);
    }

    pub(crate) fn move_window_to(&mut self, y: i64, cause: &str) {
        let y = y.max(0);
        if y != self.viewport.scroll_y {
            self.viewport.scroll_y = y;
            self.trace_line(format!("[scroll] window y={y} cause={cause}"));
        }
    }

    pub(crate) fn element_top(&self, node_id: NodeId) -> i64 {
        self.layout
            .get(&node_id)
            .map(|layout| layout.top)
            .unwrap_or(0)
    }

    pub(crate) fn scroll_element_by(&mut self, node_id: NodeId, delta_x: i64) -> Result<()> {
        let layout = self.layout.get(&node_id).copied().unwrap_or_default();
        let max_left = (layout.scroll_width - layout.client_width).max(0);
        let current = self.dom.scroll_left(node_id)?;
        let next = current.saturating_add(delta_x).clamp(0, max_left);
        if next != current {
            self.dom.set_scroll_left(node_id, next)?;
            if self.trace {
                let label = self.trace_node_label(node_id);
                self.trace_line(format!("[scroll] {label} left={next}"));
            }
        }
        Ok(())
    }

    // Observations are delivered after every layout-affecting mutation. A watch
    // fires only when its intersecting flag changes, including the first delivery.
    pub(crate) fn deliver_observations(&mut self) -> Result<()> {
        if self.watches.is_empty() {
            return Ok(());
        }

        let mut transitions = Vec::new();
        for (index, watch) in self.watches.iter().enumerate() {
            let ratio = self.intersection_ratio(watch.target);
            let intersecting = ratio >= watch.threshold;
            if watch.intersecting != Some(intersecting) {
                transitions.push((index, intersecting, ratio));
            }
        }

        for (index, intersecting, ratio) in transitions {
            let target = self.watches[index].target;
            self.watches[index].intersecting = Some(intersecting);
            if self.trace {
                let label = self.trace_node_label(target);
                self.trace_line(format!(
                    "[observer] {label} intersecting={intersecting} ratio={ratio:.3}"
                ));
            }
            if intersecting {
                self.request_play(target)?;
            } else {
                self.request_pause(target)?;
            }
        }
        Ok(())
    }

    fn intersection_ratio(&self, node_id: NodeId) -> f64 {
        let Some(layout) = self.layout.get(&node_id) else {
            return 0.0;
        };
        if layout.height <= 0 {
            return 0.0;
        }
        let view_top = self.viewport.scroll_y;
        // Scroll positions and declared boxes may sit anywhere in the i64 range.
        let view_bottom = view_top.saturating_add(self.viewport.height);
        let bottom = layout.top.saturating_add(layout.height);
        let overlap = bottom.min(view_bottom).saturating_sub(layout.top.max(view_top));
        if overlap <= 0 {
            return 0.0;
        }
        overlap as f64 / layout.height as f64
    }
}
