//! User-facing and specialist-facing message copy.
//!
//! Every reply the attendant sends is rendered here as a pure function,
//! keeping the dispatch logic free of string literals. Formatting follows
//! chat-channel conventions (`*bold*`, `•` bullets).

use balcao_core::{contact_link, Category, Ticket};
use balcao_catalog::ProductHit;

/// Placeholder shown when a session has no captured name yet.
pub const FALLBACK_NAME: &str = "cliente";

/// Sentinel product recorded on tickets when triage text matches nothing.
pub const UNSPECIFIED_PRODUCT: &str = "não especificado";

/// Summary relayed in place of media content.
pub const MEDIA_SUMMARY: &str = "[mídia recebida]";

/// First contact: greet and ask for the visitor's name.
pub fn welcome(company: &str) -> String {
    format!(
        "Olá! 👋 Bem-vindo à *{company}*.\n\n\
         Para começarmos, qual é o seu nome?"
    )
}

pub fn name_too_short() -> String {
    "Não consegui entender. 🙂 Pode me dizer seu nome, por favor?".to_string()
}

/// The fixed main menu, personalized with the captured name.
pub fn main_menu(name: &str, company: &str) -> String {
    format!(
        "Olá, *{name}*! 👋\n\
         Sou o assistente virtual da {company}.\n\n\
         Como posso ajudar?\n\n\
         *1* - Receber nosso catálogo\n\
         *2* - Conhecer as linhas de produtos\n\
         *3* - Peças e acessórios\n\
         *4* - Suporte técnico\n\
         *5* - Agendar manutenção\n\
         *6* - Falar com um especialista\n\n\
         *0* - Encerrar atendimento\n\n\
         Você também pode digitar o nome de um produto para ver os detalhes."
    )
}

/// Product card: name, description, spec bullets, category, and a
/// call-to-action pointing at the specialist option.
pub fn product_card(hit: &ProductHit<'_>) -> String {
    let mut card = format!("*{}*\n", hit.product.name);

    if !hit.product.description.is_empty() {
        card.push('\n');
        card.push_str(&hit.product.description);
        card.push('\n');
    }

    if !hit.product.tech_specs.is_empty() {
        card.push_str("\n*Especificações:*\n");
        for spec in &hit.product.tech_specs {
            card.push_str("• ");
            card.push_str(spec);
            card.push('\n');
        }
    }

    card.push_str(&format!("\nLinha: {}\n", hit.category.title));
    card.push_str("\nPara valores e condições, digite *6* e fale com um especialista. 😉");
    card
}

pub fn option_not_recognized() -> String {
    "Desculpe, não reconheci essa opção. 🤔\n\n\
     Digite *menu* para ver as opções novamente, ou o nome de um produto para ver os detalhes."
        .to_string()
}

/// Caption sent alongside the catalog document.
pub fn catalog_caption(company: &str) -> String {
    format!("Aqui está o catálogo da {company}! 📖")
}

/// Notice for menu option 1 when no catalog artifact is configured.
pub fn catalog_unavailable() -> String {
    "Poxa, nosso catálogo está indisponível no momento. 😕\n\n\
     Digite *6* para falar com um especialista e receber as informações por aqui."
        .to_string()
}

/// Category browsing prompt for menu option 2.
pub fn category_prompt(categories: &[Category]) -> String {
    let mut text = String::from("Nossas linhas de produtos: 🏭\n\n");
    for category in categories {
        text.push_str("• *");
        text.push_str(&category.title);
        text.push('*');
        if !category.sub.is_empty() {
            text.push_str(" — ");
            text.push_str(&category.sub);
        }
        text.push('\n');
    }
    text.push_str("\nDigite o nome de um produto para ver detalhes e especificações.");
    text
}

/// Parts inquiry prompt for menu option 3; the conversation moves to a
/// human from here.
pub fn parts_prompt(name: &str) -> String {
    format!(
        "Certo, {name}! 🔧 Para peças e acessórios vou te conectar com nossa equipe.\n\n\
         Pode enviar aqui o que você precisa (peça e modelo do equipamento) \
         que um atendente já te responde."
    )
}

/// Support intake prompt for menu options 4 and 5.
pub fn support_prompt(name: &str) -> String {
    format!(
        "Vamos te ajudar, {name}! 🛠️\n\n\
         Me conta em uma mensagem: qual equipamento e o que está acontecendo?"
    )
}

/// Acknowledgment after a support ticket is recorded.
pub fn triage_ack(name: &str) -> String {
    format!(
        "Obrigado, {name}! ✅ Registrei sua solicitação e nossa equipe \
         técnica vai te chamar em breve.\n\n\
         Quando quiser voltar ao menu, é só digitar *#menu*."
    )
}

/// User-facing notice when a human handoff is triggered.
pub fn handoff_notice(name: &str) -> String {
    format!(
        "Perfeito, {name}! 👍 Já chamei um de nossos especialistas.\n\n\
         Aguarde um instante que logo você será atendido por aqui mesmo."
    )
}

/// Specialist-facing alert for a human handoff.
pub fn handoff_alert(name: &str, user_id: &str, reason: &str) -> String {
    format!(
        "🔔 *Novo atendimento humano*\n\n\
         Cliente: {name}\n\
         Contato: {}\n\
         Motivo: {reason}",
        contact_link(user_id)
    )
}

/// Specialist-facing alert for a new support ticket.
pub fn ticket_alert(ticket: &Ticket) -> String {
    format!(
        "🛠️ *Novo chamado de suporte*\n\n\
         Cliente: {}\n\
         Contato: {}\n\
         Produto: {}\n\
         Descrição: {}",
        ticket.display_name,
        contact_link(&ticket.user_id),
        ticket.product,
        ticket.description
    )
}

/// Verbatim relay of a waiting user's message to the specialist.
pub fn relay(name: &str, user_id: &str, text: &str) -> String {
    format!("💬 *{name}* ({}):\n{text}", contact_link(user_id))
}

pub fn rating_prompt(name: &str) -> String {
    format!(
        "Antes de você ir, {name}: de *1* a *5*, \
         como foi o seu atendimento até aqui?"
    )
}

/// Closing for a top rating.
pub fn closing_warm(name: &str) -> String {
    format!(
        "Uau, obrigado, {name}! ⭐ Ficamos muito felizes em ajudar.\n\n\
         Até a próxima! 👋"
    )
}

pub fn closing_plain(name: &str) -> String {
    format!(
        "Obrigado pela avaliação, {name}! 🙏 Estamos sempre por aqui.\n\n\
         Até a próxima! 👋"
    )
}

/// Closing when the user exits before a name was ever captured.
pub fn closing_no_name() -> String {
    "Atendimento encerrado. Obrigado pelo contato! 👋".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use balcao_core::Product;

    #[test]
    fn test_menu_lists_every_option() {
        let menu = main_menu("Maria", "Balcão Equipamentos");
        for option in ["*1*", "*2*", "*3*", "*4*", "*5*", "*6*", "*0*"] {
            assert!(menu.contains(option), "menu missing {option}");
        }
        assert!(menu.contains("Maria"));
    }

    #[test]
    fn test_product_card_includes_specs_and_category() {
        let product = Product {
            name: "Geladeira Expositora 410L".to_string(),
            description: "Expositora vertical porta de vidro.".to_string(),
            tech_specs: vec!["410 litros".to_string(), "220V".to_string()],
        };
        let category = Category {
            title: "Refrigeração".to_string(),
            sub: String::new(),
            products: vec![],
        };
        let hit = ProductHit {
            product: &product,
            category: &category,
        };

        let card = product_card(&hit);
        assert!(card.contains("*Geladeira Expositora 410L*"));
        assert!(card.contains("• 410 litros"));
        assert!(card.contains("• 220V"));
        assert!(card.contains("Refrigeração"));
        assert!(card.contains("*6*"));
    }

    #[test]
    fn test_product_card_omits_empty_sections() {
        let product = Product {
            name: "Batedeira Planetária".to_string(),
            description: String::new(),
            tech_specs: vec![],
        };
        let category = Category {
            title: "Panificação".to_string(),
            sub: String::new(),
            products: vec![],
        };
        let hit = ProductHit {
            product: &product,
            category: &category,
        };

        let card = product_card(&hit);
        assert!(!card.contains("Especificações"));
        assert!(card.contains("Panificação"));
    }

    #[test]
    fn test_alerts_carry_contact_link() {
        let alert = handoff_alert("Maria", "5511999990000@c.us", "falar com vendedor");
        assert!(alert.contains("https://wa.me/5511999990000"));
        assert!(alert.contains("Maria"));

        let relayed = relay("Maria", "5511999990000@c.us", "ainda está aí?");
        assert!(relayed.contains("https://wa.me/5511999990000"));
        assert!(relayed.contains("ainda está aí?"));
    }

    #[test]
    fn test_category_prompt_lists_titles() {
        let categories = vec![
            Category {
                title: "Refrigeração".to_string(),
                sub: "Geladeiras e freezers".to_string(),
                products: vec![],
            },
            Category {
                title: "Cocção".to_string(),
                sub: String::new(),
                products: vec![],
            },
        ];
        let text = category_prompt(&categories);
        assert!(text.contains("*Refrigeração* — Geladeiras e freezers"));
        assert!(text.contains("*Cocção*"));
    }
}
