use super::*;
use crate::behavior::{Behavior, MenuHandles};

#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceConfig {
    pub menu_trigger: String,
    pub menu_panel: String,
    pub fallback_nav_links: String,
    pub item_groups: Vec<String>,
    pub open_class: String,
    pub trigger_active_class: String,
    pub item_active_class: String,
    pub carousel: String,
    pub carousel_step: i64,
    pub video: String,
    pub video_threshold: f64,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            menu_trigger: ".hamburger".into(),
            menu_panel: "#main-nav".into(),
            fallback_nav_links: "header nav ul li a".into(),
            item_groups: Vec::new(),
            open_class: "open".into(),
            trigger_active_class: "active".into(),
            item_active_class: "active".into(),
            carousel: ".carousel".into(),
            carousel_step: 300,
            video: "#promo-video".into(),
            video_threshold: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnhanceSummary {
    pub menu_wired: bool,
    pub nav_items_wired: usize,
    pub fallback_links_wired: usize,
    pub group_items_wired: usize,
    pub carousels_wired: usize,
    pub video_wired: bool,
}

impl Page {
    // Wires every enhancement the page's structure supports. Absent elements
    // skip their section; malformed config selectors are reported as errors.
    // Re-invocation returns the first run's summary without wiring again.
    pub fn enhance(&mut self, config: &EnhanceConfig) -> Result<EnhanceSummary> {
        if let Some(summary) = self.enhanced {
            self.trace_line("[wire] enhance skipped: already wired".to_string());
            return Ok(summary);
        }
        // Every config selector parses before any listener or button lands:
        // a rejected config leaves the page untouched.
        validate_config_selectors(config)?;
        stacker::grow(32 * 1024 * 1024, || self.enhance_once(config))
    }

    fn enhance_once(&mut self, config: &EnhanceConfig) -> Result<EnhanceSummary> {
        let mut summary = EnhanceSummary::default();

        let trigger = self.dom.query_selector(&config.menu_trigger)?;
        let panel = self.dom.query_selector(&config.menu_panel)?;
        match (trigger, panel) {
            (Some(trigger), Some(panel)) => {
                self.listeners.add(
                    trigger,
                    "click".to_string(),
                    Behavior::ToggleMenu {
                        panel,
                        trigger,
                        open_class: config.open_class.clone(),
                        trigger_class: config.trigger_active_class.clone(),
                    },
                );
                summary.menu_wired = true;

                let handles = MenuHandles {
                    panel,
                    trigger,
                    open_class: config.open_class.clone(),
                    trigger_class: config.trigger_active_class.clone(),
                };
                summary.nav_items_wired =
                    self.wire_nav_items(panel, &config.item_active_class, Some(&handles))?;
                self.trace_line(format!(
                    "[wire] menu trigger={} panel={} items={}",
                    config.menu_trigger, config.menu_panel, summary.nav_items_wired
                ));
            }
            _ => {
                let links = self.dom.query_selector_all(&config.fallback_nav_links)?;
                for link in &links {
                    self.listeners
                        .add(*link, "click".to_string(), Behavior::RouteAnchor { menu: None });
                }
                summary.fallback_links_wired = links.len();
                self.trace_line(format!(
                    "[wire] menu controls missing; routed {} fallback links",
                    links.len()
                ));
            }
        }

        for group_selector in &config.item_groups {
            for group in self.dom.query_selector_all(group_selector)? {
                summary.group_items_wired +=
                    self.wire_item_group(group, &config.item_active_class, None);
            }
        }

        for carousel in self.dom.query_selector_all(&config.carousel)? {
            self.listeners
                .add(carousel, "wheel".to_string(), Behavior::CarouselWheel);
            self.inject_carousel_buttons(carousel, config.carousel_step)?;
            summary.carousels_wired += 1;
        }

        if self.observer_supported {
            if let Some(video) = self.dom.query_selector(&config.video)? {
                self.watches.push(IntersectionWatch {
                    target: video,
                    threshold: config.video_threshold,
                    intersecting: None,
                });
                summary.video_wired = true;
            }
        } else {
            self.trace_line(
                "[wire] intersection observation unsupported; media wiring skipped".to_string(),
            );
        }

        self.enhanced = Some(summary);
        self.trace_line(format!("[wire] enhance complete {summary:?}"));
        self.deliver_observations()?;
        Ok(summary)
    }

    fn wire_nav_items(
        &mut self,
        panel: NodeId,
        active_class: &str,
        menu: Option<&MenuHandles>,
    ) -> Result<usize> {
        let mut wired = 0;
        for group in self.dom.query_selector_all_from(panel, "ul")? {
            // Sub-lists reach the enclosing item's listener by bubbling;
            // wiring them as well would route a nested click twice.
            let nested = self
                .dom
                .find_ancestor_by_tag(group, "ul")
                .map(|outer| self.dom.is_descendant_of(outer, panel))
                .unwrap_or(false);
            if nested {
                continue;
            }
            wired += self.wire_item_group(group, active_class, menu);
        }
        Ok(wired)
    }

    fn wire_item_group(
        &mut self,
        group: NodeId,
        active_class: &str,
        menu: Option<&MenuHandles>,
    ) -> usize {
        let items = self.dom.element_children(group);
        for item in &items {
            self.listeners.add(
                *item,
                "click".to_string(),
                Behavior::ActivateItem {
                    group,
                    active_class: active_class.to_string(),
                    menu: menu.cloned(),
                },
            );
        }
        items.len()
    }

    // No duplicate-guard on purpose: a second pass would append a second pair.
    // The enhance-level flag is the only thing keeping injection single-shot.
    fn inject_carousel_buttons(&mut self, carousel: NodeId, step: i64) -> Result<()> {
        let Some(parent) = self.dom.parent(carousel) else {
            return Ok(());
        };
        self.inject_step_button(parent, carousel, "carousel-btn left", "\u{2039}", -step)?;
        self.inject_step_button(parent, carousel, "carousel-btn right", "\u{203a}", step)?;
        Ok(())
    }

    fn inject_step_button(
        &mut self,
        parent: NodeId,
        carousel: NodeId,
        class_attr: &str,
        glyph: &str,
        delta_x: i64,
    ) -> Result<()> {
        let button = self.dom.create_detached_element("button".to_string());
        self.dom.set_attr(button, "class", class_attr)?;
        self.dom.create_text(button, glyph.to_string());
        self.dom.append_child(parent, button)?;
        self.listeners.add(
            button,
            "click".to_string(),
            Behavior::CarouselStep { carousel, delta_x },
        );
        Ok(())
    }
}

fn validate_config_selectors(config: &EnhanceConfig) -> Result<()> {
    parse_selector_groups(&config.menu_trigger)?;
    parse_selector_groups(&config.menu_panel)?;
    parse_selector_groups(&config.fallback_nav_links)?;
    parse_selector_groups(&config.carousel)?;
    parse_selector_groups(&config.video)?;
    for group_selector in &config.item_groups {
        parse_selector_groups(group_selector)?;
    }
    Ok(())
}
