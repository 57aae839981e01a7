//! JavaScript snippets evaluated in the prototype page.

/// True once the prototype canvas is attached and laid out.
pub(crate) const CANVAS_READY: &str = r#"(() => {
    const canvas = document.querySelector('canvas');
    if (!canvas) return false;
    const rect = canvas.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
})()"#;

/// Bounding rectangle of the prototype canvas, or null.
pub(crate) const CANVAS_RECT: &str = r#"(() => {
    const canvas = document.querySelector('canvas');
    if (!canvas) return null;
    const rect = canvas.getBoundingClientRect();
    return { x: rect.x, y: rect.y, width: rect.width, height: rect.height };
})()"#;

/// True when the page shows a password gate.
pub(crate) const PASSWORD_FIELD_PRESENT: &str =
    "!!document.querySelector('input[type=\"password\"]')";

/// Fill the password gate and submit it.
pub(crate) fn submit_password(password: &str) -> String {
    // JSON string literals are valid JavaScript string literals.
    let literal = serde_json::Value::String(password.to_string()).to_string();
    format!(
        r#"(() => {{
    const input = document.querySelector('input[type="password"]');
    if (!input) return false;
    const setter = Object.getOwnPropertyDescriptor(HTMLInputElement.prototype, 'value').set;
    setter.call(input, {literal});
    input.dispatchEvent(new Event('input', {{ bubbles: true }}));
    const button = input.form
        ? input.form.querySelector('button[type="submit"], button:not([type])')
        : document.querySelector('button[type="submit"]');
    if (button) {{
        button.click();
    }} else if (input.form) {{
        input.form.requestSubmit();
    }} else {{
        return false;
    }}
    return true;
}})()"#
    )
}
