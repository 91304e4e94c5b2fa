//! UI strings in the five menu languages.

use std::collections::HashMap;
use std::sync::OnceLock;

use ementa_menu::Language;

// [pt, en, fr, de, es]
type Row = [&'static str; 5];

fn lang_index(lang: Language) -> usize {
    match lang {
        Language::Pt => 0,
        Language::En => 1,
        Language::Fr => 2,
        Language::De => 3,
        Language::Es => 4,
    }
}

fn table() -> &'static HashMap<&'static str, Row> {
    static TABLE: OnceLock<HashMap<&'static str, Row>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m: HashMap<&'static str, Row> = HashMap::new();

        // Header and navigation
        m.insert("slogan", ["O verdadeiro sabor da tradição", "The true taste of tradition", "Le vrai goût de la tradition", "Der wahre Geschmack der Tradition", "El verdadero sabor de la tradición"]);
        m.insert("call_to_order", ["Ligar para encomendar", "Call to order", "Appeler pour commander", "Zum Bestellen anrufen", "Llamar para pedir"]);
        m.insert("search_placeholder", ["Procurar prato ou ingrediente...", "Search dish or ingredient...", "Chercher un plat ou un ingrédient...", "Gericht oder Zutat suchen...", "Buscar plato o ingrediente..."]);
        m.insert("explore", ["Explorar", "Explore", "Explorer", "Entdecken", "Explorar"]);
        m.insert("loading_menu", ["A carregar o menu...", "Loading menu...", "Chargement du menu...", "Menü wird geladen...", "Cargando el menú..."]);
        m.insert("no_items_found", ["Nenhum prato encontrado", "No dishes found", "Aucun plat trouvé", "Keine Gerichte gefunden", "No se encontraron platos"]);
        m.insert("add_to_order", ["Adicionar", "Add", "Ajouter", "Hinzufügen", "Añadir"]);
        m.insert("location", ["Localização", "Location", "Adresse", "Standort", "Ubicación"]);
        m.insert("hours", ["Horário", "Opening hours", "Horaires", "Öffnungszeiten", "Horario"]);
        m.insert("offline_mode", ["Modo offline - dados locais", "Offline mode - local data", "Mode hors ligne - données locales", "Offline-Modus - lokale Daten", "Modo sin conexión - datos locales"]);

        // Order notepad
        m.insert("my_order", ["O meu pedido", "My order", "Ma commande", "Meine Bestellung", "Mi pedido"]);
        m.insert("order_summary", ["Resumo para o telefone", "Summary for the phone call", "Résumé pour l'appel", "Übersicht für den Anruf", "Resumen para la llamada"]);
        m.insert("empty_cart", ["Ainda não escolheu nada", "Nothing chosen yet", "Rien de choisi pour l'instant", "Noch nichts ausgewählt", "Aún no ha elegido nada"]);
        m.insert("clear_all", ["Limpar tudo", "Clear all", "Tout effacer", "Alles löschen", "Borrar todo"]);
        m.insert("remove", ["Remover", "Remove", "Retirer", "Entfernen", "Quitar"]);
        m.insert("total", ["Total", "Total", "Total", "Summe", "Total"]);

        // Admin
        m.insert("restricted_access", ["Acesso restrito", "Restricted access", "Accès restreint", "Eingeschränkter Zugang", "Acceso restringido"]);
        m.insert("access_panel", ["Entrar no painel", "Open panel", "Accéder au panneau", "Zum Bereich", "Acceder al panel"]);
        m.insert("password", ["Palavra-passe", "Password", "Mot de passe", "Passwort", "Contraseña"]);
        m.insert("wrong_password", ["Palavra-passe incorreta", "Wrong password", "Mot de passe incorrect", "Falsches Passwort", "Contraseña incorrecta"]);
        m.insert("admin_panel", ["Modo administrador", "Admin mode", "Mode administrateur", "Admin-Modus", "Modo administrador"]);
        m.insert("update_menu", ["Atualizar menu", "Update menu", "Mettre à jour le menu", "Menü aktualisieren", "Actualizar menú"]);
        m.insert("saving", ["A guardar...", "Saving...", "Enregistrement...", "Speichern...", "Guardando..."]);
        m.insert("saved", ["Guardado!", "Saved!", "Enregistré !", "Gespeichert!", "¡Guardado!"]);
        m.insert("save_failed", ["Erro na sincronização", "Sync failed", "Échec de la synchronisation", "Synchronisierung fehlgeschlagen", "Error de sincronización"]);
        m.insert("logout", ["Sair", "Log out", "Déconnexion", "Abmelden", "Salir"]);
        m.insert("settings", ["Definições", "Settings", "Paramètres", "Einstellungen", "Ajustes"]);
        m.insert("new_password", ["Nova palavra-passe", "New password", "Nouveau mot de passe", "Neues Passwort", "Nueva contraseña"]);
        m.insert("confirm_password", ["Confirmar palavra-passe", "Confirm password", "Confirmer le mot de passe", "Passwort bestätigen", "Confirmar contraseña"]);
        m.insert("api_url", ["URL da API do menu", "Menu API URL", "URL de l'API du menu", "Menü-API-URL", "URL de la API del menú"]);
        m.insert("save_settings", ["Guardar definições", "Save settings", "Enregistrer", "Einstellungen speichern", "Guardar ajustes"]);
        m.insert("password_mismatch", ["As palavras-passe não coincidem", "Passwords do not match", "Les mots de passe ne correspondent pas", "Passwörter stimmen nicht überein", "Las contraseñas no coinciden"]);
        m.insert("upload_image", ["Carregar imagem", "Upload image", "Téléverser une image", "Bild hochladen", "Subir imagen"]);
        m.insert("image", ["Imagem (URL)", "Image (URL)", "Image (URL)", "Bild (URL)", "Imagen (URL)"]);
        m.insert("save_item", ["Guardar prato", "Save dish", "Enregistrer le plat", "Gericht speichern", "Guardar plato"]);
        m.insert("number", ["Número", "Number", "Numéro", "Nummer", "Número"]);
        m.insert("name", ["Nome", "Name", "Nom", "Name", "Nombre"]);
        m.insert("price", ["Preço", "Price", "Prix", "Preis", "Precio"]);
        m.insert("ingredients", ["Ingredientes", "Ingredients", "Ingrédients", "Zutaten", "Ingredientes"]);

        // Share
        m.insert("share_menu", ["Partilhar menu", "Share menu", "Partager le menu", "Menü teilen", "Compartir menú"]);
        m.insert("point_camera", ["Aponte a câmara para o código", "Point your camera at the code", "Pointez l'appareil photo vers le code", "Kamera auf den Code richten", "Apunte la cámara al código"]);
        m.insert("copy_link", ["Copiar link", "Copy link", "Copier le lien", "Link kopieren", "Copiar enlace"]);

        // Print
        m.insert("print", ["Imprimir", "Print", "Imprimer", "Drucken", "Imprimir"]);
        m.insert("adjustments", ["Ajustes", "Adjustments", "Réglages", "Anpassungen", "Ajustes"]);
        m.insert("paper", ["Papel", "Paper", "Papier", "Papier", "Papel"]);
        m.insert("orientation", ["Orientação", "Orientation", "Orientation", "Ausrichtung", "Orientación"]);
        m.insert("portrait", ["Vertical", "Portrait", "Portrait", "Hochformat", "Vertical"]);
        m.insert("landscape", ["Horizontal", "Landscape", "Paysage", "Querformat", "Horizontal"]);
        m.insert("columns", ["Colunas", "Columns", "Colonnes", "Spalten", "Columnas"]);
        m.insert("font_size", ["Tamanho da letra", "Font size", "Taille de police", "Schriftgröße", "Tamaño de letra"]);
        m.insert("photos", ["Fotos", "Photos", "Photos", "Fotos", "Fotos"]);
        m.insert("bw", ["Preto e branco", "Black and white", "Noir et blanc", "Schwarzweiß", "Blanco y negro"]);

        m
    })
}

/// Translate `key`. Unknown keys come back unchanged.
pub fn t(lang: Language, key: &'static str) -> &'static str {
    table()
        .get(key)
        .map(|row| row[lang_index(lang)])
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_per_language() {
        assert_eq!(t(Language::Pt, "total"), "Total");
        assert_eq!(t(Language::De, "total"), "Summe");
        assert_eq!(t(Language::En, "call_to_order"), "Call to order");
    }

    #[test]
    fn unknown_key_passes_through() {
        assert_eq!(t(Language::Fr, "no.such.key"), "no.such.key");
    }

    #[test]
    fn no_empty_translations() {
        for (key, row) in table() {
            for (i, text) in row.iter().enumerate() {
                assert!(!text.is_empty(), "{} has an empty entry at {}", key, i);
            }
        }
    }
}
