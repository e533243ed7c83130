//! Integration tests rendering the bundled partials
//!
//! Every helper is rendered end-to-end through a request scope against the
//! partials shipped in `templates/`.

use acton_form_mixins::fields::{FieldConfig, Mixin};
use acton_form_mixins::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;

fn catalog() -> Catalog {
    Catalog::from_json(&json!({
        "buttons": { "continue": "Continue", "next": "Next" },
        "fields": {
            "email": { "label": "Email address", "hint": "We will not share it" },
            "colour": {
                "legend": "Favourite colour",
                "options": { "red": { "label": "Red" }, "blue": { "label": "Blue" } }
            },
            "contact-email": { "label": "Your email" },
            "agree": { "label": "I agree to the terms" },
            "dob": { "legend": "Date of birth" }
        }
    }))
}

fn mixins(fields: serde_json::Value) -> FormMixins {
    FormMixins::new(MixinsConfig::default(), catalog())
        .with_fields_json(fields)
        .unwrap()
}

fn views_config(dir: &Path) -> MixinsConfig {
    let mut config = MixinsConfig::default();
    config.templates.views_directory = dir.to_path_buf();
    config
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_input_text_group() {
    let mixins = mixins(json!({ "email": { "type": "email", "validate": ["required"] } }));
    let scope = mixins.scope(RequestContext::new().with_value("email", "ada@example.com"));
    let html = scope.render("input-text", "email").unwrap();

    assert!(html.contains(r#"id="email-group""#));
    assert!(html.contains("Email address"));
    assert!(html.contains(r#"<span id="email-hint" class="form-hint">We will not share it</span>"#));
    assert!(html.contains(r#"type="email""#));
    assert!(html.contains(r#"value="ada@example.com""#));
    assert!(html.contains(r#"aria-required="true""#));
    assert!(!html.contains("form-group-error"));
}

#[test]
fn test_values_are_escaped() {
    let mixins = mixins(json!({}));
    let scope = mixins.scope(RequestContext::new().with_value("email", r#""><script>"#));
    let html = scope.render("input-text", "email").unwrap();

    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test]
fn test_direct_error_renders_message() {
    let mixins = mixins(json!({}));
    let mut error = ErrorEntry::new("email", "required");
    error.message = Some("Enter your email address".into());
    let scope = mixins.scope(RequestContext::new().with_error(error));
    let html = scope.render("input-text", "email").unwrap();

    assert!(html.contains("form-group-error"));
    assert!(html.contains("Enter your email address"));
    assert!(html.contains(r#"aria-invalid="true""#));
}

#[test]
fn test_textarea() {
    let mixins = mixins(json!({ "notes": { "validate": { "type": "maxlength", "arguments": 500 } } }));
    let scope = mixins.scope(RequestContext::new().with_value("notes", "Hello"));
    let html = scope.render("textarea", "notes").unwrap();

    assert!(html.contains("<textarea"));
    assert!(html.contains(r#"maxlength="500""#));
    assert!(html.contains(">Hello</textarea>"));
}

#[test]
fn test_radio_group() {
    let mixins = mixins(json!({ "colour": { "options": ["red", "blue"] } }));
    let scope = mixins.scope(RequestContext::new().with_value("colour", "blue"));
    let html = scope.render("radio-group", "colour").unwrap();

    assert!(html.contains(r#"role="radiogroup""#));
    assert!(html.contains("Favourite colour"));
    assert!(html.contains(r#"id="colour-blue" value="blue" checked="checked""#));
    assert!(html.contains(r#"id="colour-red" value="red">"#));
    assert!(html.contains("Red"));
}

#[test]
fn test_checkbox_group_role() {
    let mixins = mixins(json!({ "colour": { "options": ["red"] } }));
    let scope = mixins.scope(RequestContext::new());
    let html = scope.render("checkbox-group", "colour").unwrap();

    assert!(html.contains(r#"role="group""#));
    assert!(html.contains(r#"type="checkbox""#));
}

#[test]
fn test_select() {
    let mixins = mixins(json!({
        "country": { "options": [{ "value": "uk", "label": "United Kingdom" }, { "value": "fr", "label": "France" }] }
    }));
    let scope = mixins.scope(RequestContext::new().with_value("country", "uk"));
    let html = scope.render("select", "country").unwrap();

    assert!(html.contains(r#"<select name="country" id="country""#));
    assert!(html.contains(r#"<option value="uk" selected="selected">United Kingdom</option>"#));
    assert!(html.contains(r#"<option value="fr">France</option>"#));
}

#[test]
fn test_option_child_renders_mixin_in_panel() {
    let mixins = mixins(json!({
        "contact": {
            "options": [
                { "value": "email", "toggle": "contact-email", "child": "input-text" },
                "phone"
            ]
        }
    }));
    let scope = mixins.scope(RequestContext::new());
    let html = scope.render("radio-group", "contact").unwrap();

    assert!(html.contains(r#"<div id="contact-email-panel" class="reveal js-hidden">"#));
    assert!(html.contains(r#"name="contact-email""#));
    assert!(html.contains("Your email"));
    assert!(html.contains(r#"data-toggle="contact-email""#));
}

#[test]
fn test_inline_child_template() {
    let mixins = mixins(json!({
        "contact": { "options": [{ "value": "post", "child": "<p>Post to {{ value }}</p>" }] }
    }));
    let scope = mixins.scope(RequestContext::new());
    let html = scope.render("radio-group", "contact").unwrap();

    assert!(html.contains("<p>Post to post</p>"));
}

#[test]
fn test_partial_child() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("extra.html"), "<p class=\"extra\">{{ label }}</p>");

    let mixins = mixins(json!({ "agree": { "child": "partials/extra" } }));
    let request = RequestContext::new().with_partial("partials-extra", dir.path().join("extra"));
    let html = mixins.scope(request).render("checkbox", "agree").unwrap();

    assert!(html.contains(r#"<p class="extra">I agree to the terms</p>"#));
}

#[test]
fn test_checkbox() {
    let mixins = mixins(json!({}));
    let scope = mixins.scope(RequestContext::new().with_value("agree", "true"));

    let html = scope.render("checkbox", "agree").unwrap();
    assert!(html.contains(r#"class="block-label""#));
    assert!(html.contains(r#"checked="checked""#));
    assert!(html.contains("I agree to the terms"));
    assert!(!html.contains("aria-required"));

    let html = scope.render("checkbox-required", "agree").unwrap();
    assert!(html.contains(r#"aria-required="true""#));

    let html = scope.render("checkbox-compound", "agree").unwrap();
    assert!(html.contains("form-group-compound"));
}

#[test]
fn test_checkbox_child_mixin() {
    let mixins = mixins(json!({ "agree": { "toggle": "contact-email", "child": "input-text" } }));
    let html = mixins
        .scope(RequestContext::new())
        .render("checkbox", "agree")
        .unwrap();

    assert!(html.contains(r#"id="contact-email-panel""#));
    assert!(html.contains(r#"name="contact-email""#));
}

#[test]
fn test_submit_button() {
    let mixins = mixins(json!({}));
    let scope = mixins.scope(RequestContext::new());

    assert_eq!(
        scope.render("input-submit", "").unwrap(),
        r#"<input type="submit" value="Next" id="submit-button" class="button">"#
    );
    let html = scope.render("input-submit", "continue save").unwrap();
    assert!(html.contains(r#"value="Continue" id="save""#));

    let config = FieldConfig::from_value(json!({ "key": "send", "labelKey": "buttons.continue" })).unwrap();
    let html = scope.render_mixin(Mixin::InputSubmit, config).unwrap();
    assert!(html.contains(r#"value="Continue" id="send""#));
}

#[test]
fn test_date_group() {
    let mixins = mixins(json!({}));
    let scope = mixins.scope(RequestContext::new().with_value("dob-year", "1984"));
    let html = scope.render("input-date-group", "dob").unwrap();

    let group = html.find(r#"<fieldset id="dob""#).unwrap();
    let day = html.find(r#"name="dob-day""#).unwrap();
    let month = html.find(r#"name="dob-month""#).unwrap();
    let year = html.find(r#"name="dob-year""#).unwrap();
    let end = html.find("</fieldset>").unwrap();
    assert!(group < day && day < month && month < year && year < end);

    assert!(html.contains("Date of birth"));
    assert!(html.contains(r#"class="form-group form-date""#));
    assert!(html.contains(r#"value="1984""#));
    assert!(html.contains(r#"pattern="[0-9]*""#));
}

#[test]
fn test_inexact_date_has_no_day() {
    let mixins = mixins(json!({ "expiry": { "inexact": true } }));
    let html = mixins
        .scope(RequestContext::new())
        .render("input-date", "expiry")
        .unwrap();

    assert!(!html.contains("expiry-day"));
    assert!(html.contains(r#"name="expiry-month""#));
}

#[test]
fn test_error_group_markers() {
    let mixins = mixins(json!({}));
    let scope = mixins.scope(RequestContext::new());
    let open = scope.render("error-group", "dob").unwrap();
    let close = scope.render("error-group-end", "").unwrap();

    assert!(open.contains(r#"<fieldset id="dob">"#));
    assert!(!open.contains("</fieldset>"));
    assert_eq!(close.trim(), "</fieldset>\n</div>");
}

#[test]
fn test_call_context_is_visible() {
    let mixins = mixins(json!({ "name": { "label": { "value": "Name of {{ person }}" } } }));
    let scope = mixins.scope(RequestContext::new());
    let mut call = Context::new();
    call.insert("person".into(), json!("the applicant"));

    let html = scope.render_in(Mixin::InputText, "name", &call).unwrap();
    assert!(html.contains("Name of the applicant"));
}

#[test]
fn test_partial_override_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("custom.html"), "custom {{ key }}");

    let mut config = MixinsConfig::default();
    config
        .templates
        .partials
        .insert("partials-forms-input-text-group".into(), dir.path().join("custom"));
    let mixins = FormMixins::new(config, IdentityTranslator);

    let html = mixins.scope(RequestContext::new()).render("input-text", "a").unwrap();
    assert_eq!(html, "custom a");
}

#[test]
fn test_template_cache_and_bypass() {
    let dir = tempfile::tempdir().unwrap();
    let partial = dir.path().join("partials/forms/input-text-group.html");
    write(&partial, "first {{ key }}");

    let mixins = FormMixins::new(views_config(dir.path()), IdentityTranslator);
    assert_eq!(mixins.scope(RequestContext::new()).render("input-text", "a").unwrap(), "first a");

    write(&partial, "second {{ key }}");
    assert_eq!(mixins.scope(RequestContext::new()).render("input-text", "a").unwrap(), "first a");
    assert_eq!(
        mixins
            .scope(RequestContext::new().without_view_cache())
            .render("input-text", "a")
            .unwrap(),
        "second a"
    );
    assert_eq!(mixins.templates().cache().len(), 1);
}

#[test]
fn test_missing_partial_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mixins = FormMixins::new(views_config(dir.path()), IdentityTranslator);
    let err = mixins
        .scope(RequestContext::new())
        .render("input-text", "a")
        .unwrap_err();

    assert!(matches!(err, MixinError::TemplateRead { .. }));
}
