//! Check behavior against scripted pages

mod support;

use lander_common::{Mode, Status};
use lander_qa::config::Selectors;
use support::{image, run_viewport, Element, PageScript, LOCAL_TARGET};
use test_case::test_case;

fn healthy() -> PageScript {
    PageScript::healthy(1440)
}

#[tokio::test]
async fn test_healthy_page_passes_everything() {
    let run = run_viewport(healthy(), Mode::PreDeploy, LOCAL_TARGET).await;

    assert_eq!(
        run.names(),
        vec![
            "page-load",
            "no-placeholders",
            "no-console-errors",
            "no-image-404s",
            "images-not-broken",
            "header-visible",
            "product-section",
            "cta-buttons",
            "faq-accordion",
            "bundle-selector",
            "no-overflow",
            "footer-present",
            "cart-drawer",
        ]
    );
    for outcome in &run.outcomes {
        assert_eq!(outcome.status(), Status::Pass, "{}: {}", outcome.name(), outcome.detail());
        assert_eq!(outcome.fix(), None);
        assert_eq!(outcome.viewport(), "desktop");
    }
}

#[tokio::test]
async fn test_placeholders_fail_with_unique_tokens() {
    let mut script = healthy();
    script.body_text = "Only {{PRICE}} today! {{PRICE}} {{PRODUCT_NAME}} {{SKU_2}}".to_string();

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("no-placeholders");
    assert_eq!(outcome.status(), Status::Fail);
    assert_eq!(
        outcome.detail(),
        "4 raw placeholders found: {{PRICE}}, {{PRODUCT_NAME}}, {{SKU_2}}"
    );
    assert!(outcome.fix().is_some());
}

#[tokio::test]
async fn test_console_and_page_errors_fail() {
    let mut script = healthy();
    script.events.console_errors = vec!["ReferenceError: Shopify is not defined".to_string()];
    script.events.page_errors = vec!["TypeError: cannot read 'open'".to_string()];

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("no-console-errors");
    assert_eq!(outcome.status(), Status::Fail);
    assert!(outcome.detail().starts_with("2 JS errors: ReferenceError"));
    assert!(outcome.detail().contains(" | TypeError"));
}

#[tokio::test]
async fn test_missing_logo_fails_image_404s() {
    let mut script = healthy();
    script
        .fail_request("file:///site/images/logo.webp")
        .fail_request("file:///site/favicon.ico");

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;

    let images = run.get("no-image-404s");
    assert_eq!(images.status(), Status::Fail);
    assert!(images.detail().contains("logo.webp"));
    assert!(images.fix().is_some());

    let others = run.get("no-other-404s");
    assert_eq!(others.status(), Status::Warn);
    assert!(others.detail().contains("favicon.ico"));
}

#[tokio::test]
async fn test_events_drained_once_per_context() {
    let mut script = healthy();
    script.fail_request("file:///site/images/hero.webp");

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    assert_eq!(run.journal.count("drain"), 1);
    assert_eq!(run.get("no-image-404s").status(), Status::Fail);
}

#[tokio::test]
async fn test_broken_images() {
    let mut script = healthy();
    script.images = vec![image("images/hero.webp", 1200), image("images/missing.webp", 0)];

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("images-not-broken");
    assert_eq!(outcome.status(), Status::Fail);
    assert_eq!(outcome.detail(), "1 broken image(s): images/missing.webp");
}

#[tokio::test]
async fn test_no_content_images_is_a_warning() {
    let mut script = healthy();
    script.images.clear();

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    assert_eq!(run.get("images-not-broken").status(), Status::Warn);
}

#[tokio::test]
async fn test_header_missing_warns_collapsed_fails() {
    let header = Selectors::default().header.union();

    let mut missing = healthy();
    missing.remove(&header);
    let run = run_viewport(missing, Mode::PreDeploy, LOCAL_TARGET).await;
    assert_eq!(run.get("header-visible").status(), Status::Warn);

    let mut collapsed = healthy();
    collapsed.set(header, Element::shown(1, 0.0));
    let run = run_viewport(collapsed, Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("header-visible");
    assert_eq!(outcome.status(), Status::Fail);
    assert_eq!(outcome.detail(), "Header has zero height");
}

#[tokio::test]
async fn test_short_product_section_fails() {
    let mut script = healthy();
    script.set(Selectors::default().product.union(), Element::shown(1, 60.0));

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("product-section");
    assert_eq!(outcome.status(), Status::Fail);
    assert_eq!(outcome.detail(), "Product section too small or hidden");
}

#[tokio::test]
async fn test_hidden_cta_buttons_fail() {
    let mut script = healthy();
    script.set(Selectors::default().cta.union(), Element::hidden(4));

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("cta-buttons");
    assert_eq!(outcome.status(), Status::Fail);
    assert_eq!(outcome.detail(), "CTA buttons exist but none are visible");
}

#[test_case(3, Status::Pass; "three items pass")]
#[test_case(2, Status::Warn; "two items warn")]
#[test_case(0, Status::Fail; "no items fail")]
#[tokio::test]
async fn test_faq_item_counts(items: usize, expected: Status) {
    let mut script = healthy();
    script.set(Selectors::default().faq.union(), Element::shown(items, 60.0));

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    assert_eq!(run.get("faq-accordion").status(), expected);
}

#[tokio::test]
async fn test_faq_click_failure_warns() {
    let mut script = healthy();
    script.failing_clicks.insert(Selectors::default().faq.union());

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("faq-accordion");
    assert_eq!(outcome.status(), Status::Warn);
    assert!(outcome.detail().starts_with("FAQ items exist but click failed"));
}

#[tokio::test]
async fn test_single_bundle_card_warns() {
    let mut script = healthy();
    script.set(Selectors::default().bundle.union(), Element::shown(1, 300.0));

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("bundle-selector");
    assert_eq!(outcome.status(), Status::Warn);
    assert_eq!(outcome.detail(), "Found 1 bundle cards (expected 2+)");
}

#[tokio::test]
async fn test_overflow_reports_excess() {
    let run = run_viewport(PageScript::healthy(1460), Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("no-overflow");
    assert_eq!(outcome.status(), Status::Fail);
    assert_eq!(
        outcome.detail(),
        "Body width (1460px) exceeds viewport (1440px) by 20px"
    );
}

#[tokio::test]
async fn test_overflow_within_tolerance_passes() {
    let run = run_viewport(PageScript::healthy(1445), Mode::PreDeploy, LOCAL_TARGET).await;
    assert_eq!(run.get("no-overflow").status(), Status::Pass);
}

#[tokio::test]
async fn test_cart_drawer_without_trigger_warns() {
    let mut script = healthy();
    script.remove("[data-cart-toggle]");

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("cart-drawer");
    assert_eq!(outcome.status(), Status::Warn);
    assert_eq!(outcome.detail(), "No cart trigger button found");
    assert!(run.find("cart-drawer-close").is_none());
}

#[tokio::test]
async fn test_cart_trigger_falls_back_to_later_candidate() {
    let mut script = healthy();
    let drawer = Selectors::default().cart_drawer.union();
    script.remove("[data-cart-toggle]");
    script.set(".cart-icon", Element::shown(1, 32.0));
    script
        .click_effects
        .insert(".cart-icon".to_string(), (drawer, true));

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    assert_eq!(run.get("cart-drawer").status(), Status::Pass);
    assert!(run.journal.calls().iter().any(|c| c == "click desktop .cart-icon"));
}

#[tokio::test]
async fn test_cart_drawer_not_opening_warns() {
    let mut script = healthy();
    script.click_effects.remove("[data-cart-toggle]");

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("cart-drawer");
    assert_eq!(outcome.status(), Status::Warn);
    assert_eq!(outcome.detail(), "Cart drawer exists but not visible after click");
}

#[tokio::test]
async fn test_cart_drawer_missing_close_control_warns() {
    let mut script = healthy();
    script.remove(".cart-drawer__close");

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    assert_eq!(run.get("cart-drawer").status(), Status::Pass);
    assert_eq!(run.get("cart-drawer-close").status(), Status::Warn);
}

#[tokio::test]
async fn test_cart_drawer_that_stays_open_warns() {
    let mut script = healthy();
    script.click_effects.remove(".cart-drawer__close");

    let run = run_viewport(script, Mode::PreDeploy, LOCAL_TARGET).await;
    let outcome = run.get("cart-drawer-close");
    assert_eq!(outcome.status(), Status::Warn);
    assert_eq!(outcome.detail(), "Cart drawer still open after close control click");
}

#[test_case(4200, Status::Warn; "borderline load")]
#[test_case(6000, Status::Fail; "slow load")]
#[test_case(1500, Status::Pass; "fast load")]
#[tokio::test]
async fn test_page_speed(load_ms: i64, expected: Status) {
    let mut script = healthy();
    if let Some(timing) = script.timing.as_mut() {
        timing.load_ms = load_ms;
    }

    let run = run_viewport(script, Mode::PostDeploy, "https://shop.example.com").await;
    let outcome = run.get("page-speed");
    assert_eq!(outcome.status(), expected);
    assert!(outcome.detail().contains(&format!("{}ms", load_ms)));
}

#[tokio::test]
async fn test_page_speed_without_timing_warns() {
    let mut script = healthy();
    script.timing = None;

    let run = run_viewport(script, Mode::PostDeploy, "https://shop.example.com").await;
    let outcome = run.get("page-speed");
    assert_eq!(outcome.status(), Status::Warn);
    assert_eq!(outcome.detail(), "Navigation timing unavailable");
}

#[tokio::test]
async fn test_ssl_check() {
    let secure = run_viewport(healthy(), Mode::PostDeploy, "https://shop.example.com").await;
    assert_eq!(secure.get("ssl-check").status(), Status::Pass);

    let plain = run_viewport(healthy(), Mode::PostDeploy, "http://shop.example.com").await;
    let outcome = plain.get("ssl-check");
    assert_eq!(outcome.status(), Status::Warn);
    assert_eq!(outcome.detail(), "Not using HTTPS");
}

#[tokio::test]
async fn test_deploy_checks_skipped_pre_deploy() {
    let run = run_viewport(healthy(), Mode::PreDeploy, "https://shop.example.com").await;
    assert!(run.find("page-speed").is_none());
    assert!(run.find("ssl-check").is_none());
}
