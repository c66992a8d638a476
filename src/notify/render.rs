//! Rendering for both notification channels.
//!
//! The bulk channel gets one self-contained HTML document listing every
//! product; the per-item channel gets a short text message per product.
//! Both format prices to two decimal places and only show the discount
//! information when there actually is a markdown.

use chrono::{DateTime, Local};
use std::fmt::Write;

use crate::models::Product;

/// Subject line for the bulk email.
pub fn email_subject(count: usize, now: DateTime<Local>) -> String {
    format!(
        "🔥 {} Ofertas Imperdíveis - {}",
        count,
        now.format("%d/%m/%Y %H:%M")
    )
}

/// Render every product into one HTML document.
pub fn email_html(products: &[Product], now: DateTime<Local>) -> String {
    let mut html = String::new();
    let stamp = now.format("%d/%m/%Y às %H:%M");

    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Ofertas Especiais</title>
<style>
  body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 0; background: #667eea; color: #333; }}
  .container {{ max-width: 800px; margin: 0 auto; background: white; border-radius: 10px; overflow: hidden; }}
  .header {{ background: #FF6B6B; color: white; padding: 30px; text-align: center; }}
  .header h1 {{ margin: 0; font-size: 2.5em; }}
  .subtitle {{ margin: 10px 0 0 0; font-size: 1.2em; opacity: 0.9; }}
  .products {{ padding: 20px; }}
  .product {{ border: 1px solid #eee; border-radius: 10px; margin-bottom: 20px; padding: 20px; background: #fafafa; }}
  .product-title {{ font-size: 1.3em; font-weight: bold; color: #2c3e50; margin-bottom: 10px; }}
  .category-tag {{ background: #3498db; color: white; padding: 3px 8px; border-radius: 10px; font-size: 0.8em; margin-right: 10px; }}
  .price-section {{ margin: 15px 0; }}
  .original-price {{ text-decoration: line-through; color: #888; font-size: 1.1em; }}
  .current-price {{ color: #e74c3c; font-size: 1.5em; font-weight: bold; margin-left: 10px; }}
  .discount-badge {{ background: #e74c3c; color: white; padding: 5px 10px; border-radius: 15px; font-size: 0.9em; margin-left: 10px; }}
  .product-info {{ margin: 10px 0; color: #666; }}
  .buy-button {{ display: inline-block; background: #4CAF50; color: white; padding: 12px 25px; text-decoration: none; border-radius: 25px; font-weight: bold; margin-top: 15px; }}
  .footer {{ background: #2c3e50; color: white; text-align: center; padding: 20px; font-size: 0.9em; }}
</style>
</head>
<body>
<div class="container">
  <div class="header">
    <h1>🔥 Ofertas Especiais</h1>
    <div class="subtitle">{count} produtos selecionados especialmente para você!</div>
    <div class="subtitle">{stamp}</div>
  </div>
  <div class="products">
"#,
        count = products.len(),
        stamp = stamp
    )
    .unwrap();

    for product in products {
        write!(
            html,
            r#"    <div class="product">
      <div class="product-title">
        <span class="category-tag">{category}</span>
        {title}
      </div>
      <div class="price-section">
"#,
            category = product.category,
            title = product.title
        )
        .unwrap();

        if product.discount_percentage > 0.0 {
            write!(
                html,
                r#"        <span class="original-price">De R$ {original:.2}</span>
        <span class="current-price">Por R$ {current:.2}</span>
        <span class="discount-badge">-{discount:.0}%</span>
"#,
                original = product.original_price,
                current = product.current_price,
                discount = product.discount_percentage
            )
            .unwrap();
        } else {
            writeln!(
                html,
                r#"        <span class="current-price">R$ {:.2}</span>"#,
                product.current_price
            )
            .unwrap();
        }

        write!(
            html,
            r#"      </div>
      <div class="product-info">
        <div>💳 {payment}</div>
        <div>🚚 {shipping}</div>
        <div>{feedback}</div>
      </div>
      <a href="{url}" class="buy-button">📲 COMPRAR AGORA</a>
    </div>
"#,
            payment = product.payment_options,
            shipping = product.shipping_info,
            feedback = product.feedback_score,
            url = product.affiliate_url
        )
        .unwrap();
    }

    write!(
        html,
        r#"  </div>
  <div class="footer">
    <p>Sistema Automatizado de Ofertas • {stamp}</p>
    <p>Este é um email automático. Aproveite as ofertas!</p>
  </div>
</div>
</body>
</html>
"#,
        stamp = stamp
    )
    .unwrap();

    html
}

/// Emoji shown in the per-item message header for each category.
pub fn category_emoji(category: &str) -> &'static str {
    match category {
        "eletrônicos" => "📱",
        "roupas" => "👕",
        "casa" => "🏠",
        "esportes" => "⚽",
        _ => "🛒",
    }
}

/// Render one product into the short per-item message.
pub fn message_text(product: &Product) -> String {
    let mut message = format!(
        "🔥 *OFERTA ESPECIAL* {}\n\n*{}*\n\n",
        category_emoji(&product.category),
        product.title
    );

    if product.discount_percentage > 0.0 {
        write!(
            message,
            "💰 ~De R$ {:.2}~\n💸 *Por R$ {:.2}*\n🏷️ *Desconto de {:.0}%*\n\n",
            product.original_price, product.current_price, product.discount_percentage
        )
        .unwrap();
    } else {
        write!(message, "💰 *R$ {:.2}*\n\n", product.current_price).unwrap();
    }

    write!(
        message,
        "💳 {}\n🚚 {}\n{}\n\n📲 *LINK DE COMPRA* ⬇️\n{}\n\n_Oferta por tempo limitado!_ ⏰",
        product.payment_options, product.shipping_info, product.feedback_score, product.affiliate_url
    )
    .unwrap();

    message
}
