use super::*;

// Handles a nav item needs to collapse the menu it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MenuHandles {
    pub(crate) panel: NodeId,
    pub(crate) trigger: NodeId,
    pub(crate) open_class: String,
    pub(crate) trigger_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Behavior {
    ToggleMenu {
        panel: NodeId,
        trigger: NodeId,
        open_class: String,
        trigger_class: String,
    },
    ActivateItem {
        group: NodeId,
        active_class: String,
        menu: Option<MenuHandles>,
    },
    RouteAnchor {
        menu: Option<MenuHandles>,
    },
    CarouselWheel,
    CarouselStep {
        carousel: NodeId,
        delta_x: i64,
    },
}

impl Page {
    pub(crate) fn run_behavior(
        &mut self,
        behavior: &Behavior,
        event: &mut EventState,
    ) -> Result<()> {
        match behavior {
            Behavior::ToggleMenu {
                panel,
                trigger,
                open_class,
                trigger_class,
            } => self.toggle_menu(*panel, *trigger, open_class, trigger_class),
            Behavior::ActivateItem {
                group,
                active_class,
                menu,
            } => self.activate_item(*group, active_class, menu.as_ref(), event),
            Behavior::RouteAnchor { menu } => {
                self.route_anchor(event.current_target, menu.as_ref(), event)
            }
            Behavior::CarouselWheel => self.carousel_wheel(event),
            Behavior::CarouselStep { carousel, delta_x } => {
                self.carousel_step(*carousel, *delta_x)
            }
        }
    }

    fn toggle_menu(
        &mut self,
        panel: NodeId,
        trigger: NodeId,
        open_class: &str,
        trigger_class: &str,
    ) -> Result<()> {
        let open = self.dom.class_toggle(panel, open_class)?;
        if open {
            self.dom.class_add(trigger, trigger_class)?;
        } else {
            self.dom.class_remove(trigger, trigger_class)?;
        }
        self.dom
            .set_attr(trigger, "aria-expanded", if open { "true" } else { "false" })?;
        self.trace_line(format!("[menu] toggled open={open}"));
        Ok(())
    }

    fn activate_item(
        &mut self,
        group: NodeId,
        active_class: &str,
        menu: Option<&MenuHandles>,
        event: &mut EventState,
    ) -> Result<()> {
        let item = event.current_target;

        // Exclusive marker: clear every sibling before marking the clicked item.
        for sibling in self.dom.element_children(group) {
            if sibling != item {
                self.dom.class_remove(sibling, active_class)?;
            }
        }
        self.dom.class_add(item, active_class)?;

        match self.anchor_for_item(item, event.target) {
            Some(anchor) => self.route_anchor(anchor, menu, event)?,
            None => {
                // Items without a link scroll the whole page back to the top.
                self.record_scroll_request(ScrollRequest::WindowTo { y: 0, smooth: true });
                self.move_window_to(0, "item-home");
                if let Some(handles) = menu {
                    self.close_menu(handles)?;
                }
            }
        }
        Ok(())
    }

    // Prefer the link the click actually landed on; otherwise the item's first link.
    fn anchor_for_item(&self, item: NodeId, target: NodeId) -> Option<NodeId> {
        let clicked = if self.dom.has_tag(target, "a") {
            Some(target)
        } else {
            self.dom.find_ancestor_by_tag(target, "a")
        };
        if let Some(anchor) = clicked {
            if anchor == item || self.dom.is_descendant_of(anchor, item) {
                return Some(anchor);
            }
        }
        self.dom.find_descendant_by_tag(item, "a")
    }

    fn route_anchor(
        &mut self,
        anchor: NodeId,
        menu: Option<&MenuHandles>,
        event: &mut EventState,
    ) -> Result<()> {
        let Some(href) = self.dom.attr(anchor, "href") else {
            return Ok(());
        };
        if !href.starts_with('#') {
            // Off-page links keep their default navigation.
            self.trace_line(format!("[route] {href} left to default navigation"));
            return Ok(());
        }

        event.default_prevented = true;
        match self.dom.query_selector(&href) {
            Ok(Some(dest)) => {
                self.record_scroll_request(ScrollRequest::IntoView {
                    target: dest,
                    smooth: true,
                });
                let top = self.element_top(dest);
                self.move_window_to(top, "anchor-route");
            }
            Ok(None) => {
                self.trace_line(format!("[route] no destination for {href}"));
            }
            Err(_) => {
                self.trace_line(format!("[route] malformed fragment {href}"));
            }
        }

        if let Some(handles) = menu {
            self.close_menu(handles)?;
        }
        Ok(())
    }

    pub(crate) fn close_menu(&mut self, handles: &MenuHandles) -> Result<()> {
        self.dom.class_remove(handles.panel, &handles.open_class)?;
        self.dom
            .class_remove(handles.trigger, &handles.trigger_class)?;
        self.dom.set_attr(handles.trigger, "aria-expanded", "false")?;
        self.trace_line("[menu] closed".to_string());
        Ok(())
    }

    fn carousel_wheel(&mut self, event: &mut EventState) -> Result<()> {
        if event.delta_y == 0 {
            return Ok(());
        }
        event.default_prevented = true;
        self.scroll_element_by(event.current_target, event.delta_y)
    }

    fn carousel_step(&mut self, carousel: NodeId, delta_x: i64) -> Result<()> {
        self.record_scroll_request(ScrollRequest::By {
            container: carousel,
            delta_x,
            smooth: true,
        });
        self.scroll_element_by(carousel, delta_x)
    }
}
