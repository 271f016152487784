use pagewire::{EnhanceConfig, LayoutBox, Page};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};

const INTERACTION_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/interaction_property_fuzz_test.txt";
const DEFAULT_INTERACTION_PROPTEST_CASES: u32 = 128;

const LANDING_PAGE_HTML: &str = r##"
<header>
  <button class="hamburger" aria-expanded="false">menu</button>
  <nav id="main-nav">
    <ul>
      <li id="nav-home" class="active">Home</li>
      <li id="nav-features"><a href="#features">Features</a></li>
      <li id="nav-pricing"><a href="#pricing">Pricing</a></li>
    </ul>
  </nav>
</header>
<main>
  <section id="features">Features</section>
  <section id="pricing">Pricing</section>
  <div class="wrap">
    <div class="carousel">
      <div class="card">A</div>
      <div class="card">B</div>
      <div class="card">C</div>
    </div>
  </div>
  <video id="promo-video" src="promo.mp4"></video>
</main>
"##;

const NAV_ITEM_SELECTORS: [&str; 3] = ["#nav-home", "#nav-features", "#nav-pricing"];
const NAV_ITEM_WINDOW_TOPS: [i64; 3] = [0, 800, 1600];

const VIEWPORT_HEIGHT: i64 = 800;
const CAROUSEL_EXTENT: i64 = 500;
const CAROUSEL_STEP: i64 = 300;
const VIDEO_TOP: i64 = 2400;
const VIDEO_HEIGHT: i64 = 400;

#[derive(Clone, Debug)]
enum PageAction {
    ClickTrigger,
    ClickNavItem(usize),
    WheelCarousel(i64),
    ClickRightButton,
    ClickLeftButton,
    ScrollWindow(i64),
    ClickInertSection,
}

// Mirror of the observable page state, advanced action by action.
struct PageModel {
    menu_open: bool,
    active_item: usize,
    carousel_left: i64,
    window_y: i64,
}

impl PageModel {
    fn new() -> Self {
        Self {
            menu_open: false,
            active_item: 0,
            carousel_left: 0,
            window_y: 0,
        }
    }

    fn apply(&mut self, action: &PageAction) {
        match action {
            PageAction::ClickTrigger => self.menu_open = !self.menu_open,
            PageAction::ClickNavItem(index) => {
                self.active_item = *index;
                self.window_y = NAV_ITEM_WINDOW_TOPS[*index];
                self.menu_open = false;
            }
            PageAction::WheelCarousel(delta) => {
                self.carousel_left = (self.carousel_left + delta).clamp(0, CAROUSEL_EXTENT);
            }
            PageAction::ClickRightButton => {
                self.carousel_left =
                    (self.carousel_left + CAROUSEL_STEP).clamp(0, CAROUSEL_EXTENT);
            }
            PageAction::ClickLeftButton => {
                self.carousel_left =
                    (self.carousel_left - CAROUSEL_STEP).clamp(0, CAROUSEL_EXTENT);
            }
            PageAction::ScrollWindow(y) => self.window_y = (*y).max(0),
            PageAction::ClickInertSection => {}
        }
    }

    fn expects_playing(&self) -> bool {
        let view_bottom = self.window_y + VIEWPORT_HEIGHT;
        let video_bottom = VIDEO_TOP + VIDEO_HEIGHT;
        let overlap = video_bottom.min(view_bottom) - VIDEO_TOP.max(self.window_y);
        // Visible tenth of the element flips playback on.
        overlap * 10 >= VIDEO_HEIGHT
    }
}

fn env_proptest_cases(var_name: &str, default_cases: u32) -> u32 {
    std::env::var(var_name)
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default_cases)
}

fn interaction_proptest_cases() -> u32 {
    std::env::var("PAGEWIRE_INTERACTION_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or_else(|| {
            env_proptest_cases(
                "PAGEWIRE_PROPTEST_CASES",
                DEFAULT_INTERACTION_PROPTEST_CASES,
            )
        })
}

fn page_action_strategy() -> BoxedStrategy<PageAction> {
    prop_oneof![
        3 => Just(PageAction::ClickTrigger),
        4 => (0usize..3).prop_map(PageAction::ClickNavItem),
        3 => (-600i64..=600).prop_map(PageAction::WheelCarousel),
        2 => Just(PageAction::ClickRightButton),
        2 => Just(PageAction::ClickLeftButton),
        2 => (-400i64..=3200).prop_map(PageAction::ScrollWindow),
        1 => Just(PageAction::ClickInertSection),
    ]
    .boxed()
}

fn page_action_sequence_strategy() -> BoxedStrategy<Vec<PageAction>> {
    vec(page_action_strategy(), 1..=24).boxed()
}

fn wired_landing_page() -> pagewire::Result<Page> {
    let mut page = Page::from_html(LANDING_PAGE_HTML)?;
    page.set_viewport_height(VIEWPORT_HEIGHT)?;
    page.set_layout(
        "#features",
        LayoutBox {
            top: 800,
            height: 600,
            ..Default::default()
        },
    )?;
    page.set_layout(
        "#pricing",
        LayoutBox {
            top: 1600,
            height: 600,
            ..Default::default()
        },
    )?;
    page.set_layout(
        ".carousel",
        LayoutBox {
            top: 2200,
            height: 200,
            scroll_width: 900,
            client_width: 400,
        },
    )?;
    page.set_layout(
        "#promo-video",
        LayoutBox {
            top: VIDEO_TOP,
            height: VIDEO_HEIGHT,
            ..Default::default()
        },
    )?;
    page.enhance(&EnhanceConfig::default())?;
    Ok(page)
}

fn run_action(page: &mut Page, action: &PageAction) -> pagewire::Result<()> {
    match action {
        PageAction::ClickTrigger => page.click(".hamburger"),
        PageAction::ClickNavItem(index) => page.click(NAV_ITEM_SELECTORS[*index]),
        PageAction::WheelCarousel(delta) => page.wheel(".carousel", *delta),
        PageAction::ClickRightButton => page.click(".carousel-btn.right"),
        PageAction::ClickLeftButton => page.click(".carousel-btn.left"),
        PageAction::ScrollWindow(y) => page.scroll_window_to(*y),
        PageAction::ClickInertSection => page.click("#features"),
    }
}

fn check_against_model(
    page: &Page,
    model: &PageModel,
    step: usize,
    action: &PageAction,
) -> TestCaseResult {
    let menu_open = page
        .has_class("#main-nav", "open")
        .map_err(|err| TestCaseError::fail(format!("{err:?}")))?;
    prop_assert_eq!(
        menu_open,
        model.menu_open,
        "menu open state diverged after step {}: {:?}",
        step,
        action
    );

    let aria_expanded = page
        .attr(".hamburger", "aria-expanded")
        .map_err(|err| TestCaseError::fail(format!("{err:?}")))?;
    prop_assert_eq!(
        aria_expanded.as_deref(),
        Some(if model.menu_open { "true" } else { "false" }),
        "aria-expanded diverged after step {}: {:?}",
        step,
        action
    );

    let actives = page
        .find_all("#main-nav li.active")
        .map_err(|err| TestCaseError::fail(format!("{err:?}")))?;
    prop_assert_eq!(
        actives.len(),
        1,
        "expected exactly one active nav item after step {}: {:?}",
        step,
        action
    );
    let expected_item = page
        .find(NAV_ITEM_SELECTORS[model.active_item])
        .map_err(|err| TestCaseError::fail(format!("{err:?}")))?;
    prop_assert_eq!(
        actives[0],
        expected_item,
        "wrong nav item is active after step {}: {:?}",
        step,
        action
    );

    let carousel_left = page
        .scroll_left(".carousel")
        .map_err(|err| TestCaseError::fail(format!("{err:?}")))?;
    prop_assert_eq!(
        carousel_left,
        model.carousel_left,
        "carousel offset diverged after step {}: {:?}",
        step,
        action
    );

    prop_assert_eq!(
        page.window_scroll_y(),
        model.window_y,
        "window scroll diverged after step {}: {:?}",
        step,
        action
    );

    let playing = page
        .is_playing("#promo-video")
        .map_err(|err| TestCaseError::fail(format!("{err:?}")))?;
    prop_assert_eq!(
        playing,
        model.expects_playing(),
        "playback state diverged after step {}: {:?}",
        step,
        action
    );

    Ok(())
}

fn assert_interaction_sequence_is_stable(actions: &[PageAction]) -> TestCaseResult {
    let mut page =
        wired_landing_page().map_err(|err| TestCaseError::fail(format!("{err:?}")))?;
    let mut model = PageModel::new();

    for (step, action) in actions.iter().enumerate() {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            run_action(&mut page, action)
        }));

        match outcome {
            Err(_) => {
                prop_assert!(
                    false,
                    "action panicked at step {step}: {action:?}, actions={actions:?}"
                );
            }
            Ok(Err(error)) => {
                prop_assert!(
                    false,
                    "action returned error at step {step}: {action:?}, error={error:?}, actions={actions:?}"
                );
            }
            Ok(Ok(())) => {}
        }

        model.apply(action);
        check_against_model(&page, &model, step, action)?;
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: interaction_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(INTERACTION_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn landing_page_action_sequences_match_the_model(actions in page_action_sequence_strategy()) {
        assert_interaction_sequence_is_stable(&actions)?;
    }
}
