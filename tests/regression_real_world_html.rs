use pagewire::{EnhanceConfig, EnhanceSummary, LayoutBox, MediaRequest, Page, ScrollRequest};

#[test]
fn full_landing_page_walkthrough_exercises_every_enhancement() -> pagewire::Result<()> {
    let html = r##"
    <header>
      <button class="hamburger" aria-expanded="false">☰</button>
      <nav id="main-nav">
        <ul>
          <li id="nav-home" class="active">Home</li>
          <li id="nav-features"><a href="#features">Features</a></li>
          <li id="nav-pricing"><a href="#pricing">Pricing</a></li>
          <li id="nav-blog"><a href="https://blog.example.com">Blog</a></li>
        </ul>
      </nav>
    </header>
    <main>
      <section id="hero">Hero</section>
      <section id="features">Features</section>
      <section id="pricing">Pricing</section>
      <div id="movies-wrap" class="wrap">
        <div id="movies" class="carousel">
          <div class="card">M1</div>
          <div class="card">M2</div>
          <div class="card">M3</div>
        </div>
      </div>
      <div id="shows-wrap" class="wrap">
        <div id="shows" class="carousel">
          <div class="card">S1</div>
          <div class="card">S2</div>
        </div>
      </div>
      <video id="promo-video" src="promo.mp4"></video>
    </main>
    "##;

    let mut page = Page::from_html(html)?;
    page.set_viewport_height(800)?;
    page.set_layout("#hero", LayoutBox { top: 0, height: 800, ..Default::default() })?;
    page.set_layout("#features", LayoutBox { top: 800, height: 700, ..Default::default() })?;
    page.set_layout("#pricing", LayoutBox { top: 1500, height: 700, ..Default::default() })?;
    page.set_layout(
        "#movies",
        LayoutBox { top: 2200, height: 200, scroll_width: 1600, client_width: 400 },
    )?;
    page.set_layout(
        "#shows",
        LayoutBox { top: 2400, height: 200, scroll_width: 800, client_width: 400 },
    )?;
    page.set_layout("#promo-video", LayoutBox { top: 2600, height: 400, ..Default::default() })?;

    let summary = page.enhance(&EnhanceConfig::default())?;
    assert_eq!(
        summary,
        EnhanceSummary {
            menu_wired: true,
            nav_items_wired: 4,
            fallback_links_wired: 0,
            group_items_wired: 0,
            carousels_wired: 2,
            video_wired: true,
        }
    );

    // The video starts off screen, so the first observation pauses it.
    let video = page.find("#promo-video")?;
    assert_eq!(
        page.take_media_requests(),
        vec![MediaRequest::Pause { target: video }]
    );

    // Open the menu, then follow a section link out of it.
    page.click(".hamburger")?;
    page.assert_class("#main-nav", "open", true)?;
    page.assert_attr(".hamburger", "aria-expanded", "true")?;

    page.click("a[href='#features']")?;
    page.assert_class("#main-nav", "open", false)?;
    page.assert_attr(".hamburger", "aria-expanded", "false")?;
    page.assert_class("#nav-features", "active", true)?;
    page.assert_class("#nav-home", "active", false)?;
    assert_eq!(page.window_scroll_y(), 800);
    assert!(!page.is_playing("#promo-video")?);

    // Pan the first carousel by wheel, then by its injected controls.
    page.wheel("#movies", 500)?;
    assert_eq!(page.scroll_left("#movies")?, 500);
    assert_eq!(page.window_scroll_y(), 800);

    page.click("#movies-wrap > .carousel-btn.right")?;
    assert_eq!(page.scroll_left("#movies")?, 800);
    page.click("#movies-wrap > .carousel-btn.left")?;
    assert_eq!(page.scroll_left("#movies")?, 500);

    // The second carousel has its own independent controls.
    page.click("#shows-wrap > .carousel-btn.right")?;
    assert_eq!(page.scroll_left("#shows")?, 300);
    assert_eq!(page.scroll_left("#movies")?, 500);

    // Bring the promo video into view, then navigate away from it.
    page.scroll_window_to(2400)?;
    assert!(page.is_playing("#promo-video")?);

    page.click("#nav-pricing")?;
    assert_eq!(page.window_scroll_y(), 1500);
    assert!(!page.is_playing("#promo-video")?);
    page.assert_class("#nav-pricing", "active", true)?;
    assert_eq!(page.find_all("#main-nav li.active")?.len(), 1);

    // An external link is activated but navigation stays untouched.
    page.click("#nav-blog")?;
    page.assert_class("#nav-blog", "active", true)?;
    assert_eq!(page.window_scroll_y(), 1500);

    let features = page.find("#features")?;
    let pricing = page.find("#pricing")?;
    let movies = page.find("#movies")?;
    let shows = page.find("#shows")?;
    assert_eq!(
        page.take_scroll_requests(),
        vec![
            ScrollRequest::IntoView { target: features, smooth: true },
            ScrollRequest::By { container: movies, delta_x: 300, smooth: true },
            ScrollRequest::By { container: movies, delta_x: -300, smooth: true },
            ScrollRequest::By { container: shows, delta_x: 300, smooth: true },
            ScrollRequest::IntoView { target: pricing, smooth: true },
        ]
    );
    assert_eq!(
        page.take_media_requests(),
        vec![
            MediaRequest::Play { target: video, granted: true },
            MediaRequest::Pause { target: video },
        ]
    );
    Ok(())
}

#[test]
fn navigation_falls_back_to_plain_links_without_menu_controls() -> pagewire::Result<()> {
    let html = r##"
    <header>
      <nav>
        <ul>
          <li><a href="#features">Features</a></li>
          <li><a href="#pricing">Pricing</a></li>
        </ul>
      </nav>
    </header>
    <section id="features">Features</section>
    <section id="pricing">Pricing</section>
    "##;

    let mut page = Page::from_html(html)?;
    page.set_layout("#features", LayoutBox { top: 900, height: 500, ..Default::default() })?;

    let summary = page.enhance(&EnhanceConfig::default())?;
    assert!(!summary.menu_wired);
    assert_eq!(summary.fallback_links_wired, 2);

    page.click("a[href='#features']")?;

    let features = page.find("#features")?;
    assert_eq!(
        page.take_scroll_requests(),
        vec![ScrollRequest::IntoView { target: features, smooth: true }]
    );
    assert_eq!(page.window_scroll_y(), 900);
    assert_eq!(page.find_all("header li.active")?.len(), 0);
    Ok(())
}

#[test]
fn bare_page_keeps_native_defaults_without_wiring() -> pagewire::Result<()> {
    let html = r##"
    <main>
      <p id="para">Plain content, nothing to wire.</p>
      <a href="#end">skip</a>
      <section id="end">End</section>
    </main>
    "##;

    let mut page = Page::from_html(html)?;
    page.set_layout("#end", LayoutBox { top: 640, height: 200, ..Default::default() })?;
    let summary = page.enhance(&EnhanceConfig::default())?;
    assert_eq!(summary, EnhanceSummary::default());

    // Native behavior survives: wheel scrolls the window, anchors jump.
    page.wheel("#para", 120)?;
    assert_eq!(page.window_scroll_y(), 120);

    page.click("a[href='#end']")?;
    assert_eq!(page.window_scroll_y(), 640);

    assert_eq!(page.take_scroll_requests(), Vec::new());
    assert_eq!(page.take_media_requests(), Vec::new());
    Ok(())
}

#[test]
fn structured_data_scripts_stay_inert_while_the_page_is_wired() -> pagewire::Result<()> {
    let html = r##"
    <script type="application/ld+json">
      {"@context":"https://schema.org","@type":"FAQPage"}
    </script>
    <header>
      <button class="hamburger">☰</button>
      <nav id="main-nav">
        <ul>
          <li><a href="#faq">FAQ</a></li>
        </ul>
      </nav>
    </header>
    <section id="faq">FAQ</section>
    <script>
      window.dataLayer = window.dataLayer || [];
    </script>
    "##;

    let mut page = Page::from_html(html)?;
    let summary = page.enhance(&EnhanceConfig::default())?;
    assert!(summary.menu_wired);
    assert_eq!(summary.nav_items_wired, 1);

    assert_eq!(page.find_all("script")?.len(), 2);
    assert!(
        page.text_content("script[type='application/ld+json']")?
            .contains("@context")
    );

    page.click("a[href='#faq']")?;
    let faq = page.find("#faq")?;
    assert_eq!(
        page.take_scroll_requests(),
        vec![ScrollRequest::IntoView { target: faq, smooth: true }]
    );
    Ok(())
}
