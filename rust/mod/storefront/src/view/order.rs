use std::fmt::Write;

use ementa_menu::Language;

use super::{escape, post_button, tel_link};
use crate::cart::CartStore;
use crate::i18n::t;

/// The order notepad: cart lines, total and the call button.
pub fn order_notepad(cart: &CartStore, lang: Language, phone: &str) -> String {
    let mut html = format!(
        r#"<aside class="order-notepad"><header><h2>{title}</h2><p>{summary}</p><span class="badge">{count}</span></header>"#,
        title = escape(t(lang, "my_order")),
        summary = escape(t(lang, "order_summary")),
        count = cart.item_count(),
    );

    if cart.is_empty() {
        let _ = write!(html, r#"<p class="empty-cart">{}</p>"#, escape(t(lang, "empty_cart")));
    } else {
        html.push_str(r#"<ul class="order-lines">"#);
        for line in cart.items() {
            let id = &line.item.id;
            let _ = write!(
                html,
                r#"<li class="order-line" data-item="{id}"><span class="quantity">{qty}x</span> <span class="name">{name}</span> <span class="price">{price}</span>"#,
                id = escape(id),
                qty = line.quantity,
                name = escape(&line.item.name),
                price = escape(&line.item.price),
            );
            html.push_str(&post_button(&format!("/cart/{}/dec", id), "cart-decrement", "−", line.quantity <= 1));
            html.push_str(&post_button(&format!("/cart/{}/inc", id), "cart-increment", "+", false));
            html.push_str(&post_button(&format!("/cart/{}/remove", id), "cart-remove", t(lang, "remove"), false));
            html.push_str("</li>");
        }
        html.push_str("</ul>");
        html.push_str(&post_button("/cart/clear", "clear-cart", t(lang, "clear_all"), false));
        let _ = write!(html, r#"<pre class="order-note">{}</pre>"#, escape(&cart.order_note(lang)));
    }

    let _ = write!(
        html,
        r#"<footer><span class="total-label">{label}</span> <strong class="total">{total:.2}€</strong><a class="call-button" href="{tel}">{call}</a></footer></aside>"#,
        label = escape(t(lang, "total")),
        total = cart.total(),
        tel = escape(&tel_link(phone)),
        call = escape(t(lang, "call_to_order")),
    );
    html
}
