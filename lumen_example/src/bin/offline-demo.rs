use anyhow::Result;
use chrono::Utc;
use lumen::prelude::*;
use lumen::{FontSize, ThemeMode, ViewMode};

fn main() -> Result<()> {
    println!("Lumen - Offline Example");
    println!("=======================\n");

    // 1. Preferences on disk
    println!("1. Opening preference storage...");
    let path = std::env::temp_dir().join("lumen-offline-demo.json");
    let preferences = PreferencesBuilder::new().json_file(&path).build()?;
    println!("   ✓ Using {}\n", path.display());

    let mut app = App::builder().preferences(preferences.clone()).build()?;
    println!("   Restored theme: {}\n", app.theme().current_theme());

    // 2. Conversations
    println!("2. Creating conversations...");
    {
        let chat = app.chat_mut();
        chat.create_conversation(Conversation::new("Trip to Lisbon").with_id("trip"));
        chat.create_conversation(Conversation::new("Quarterly numbers").with_id("q3"));
        chat.add_message("trip", Message::user("Which neighborhoods should we stay in?"));
        chat.add_message(
            "trip",
            Message::ai("Alfama and Príncipe Real are good starting points.").with_variant("travel-planner"),
        );
        chat.add_message("q3", Message::user("Draft the revenue summary"));
    }
    for conversation in app.chat().conversations() {
        println!("   ✓ {} ({} messages)", conversation.title, conversation.messages.len());
    }
    println!();

    // 3. Search
    println!("3. Searching for 'alfama'...");
    app.chat_mut().set_search_query("alfama");
    for conversation in app.chat().filtered_conversations() {
        println!("   ✓ match: {}", conversation.title);
    }
    app.chat_mut().set_search_query("");
    println!();

    // 4. Drafts follow the active conversation
    println!("4. Writing a draft...");
    app.chat_mut().set_active_conversation(Some("q3".to_string()));
    app.chat_mut().set_draft("Revenue grew 12% quarter over quarter");
    app.chat_mut().set_active_conversation(Some("trip".to_string()));
    app.chat_mut().load_draft("trip");
    println!("   Draft in 'trip': {:?}", app.chat().draft());
    app.chat_mut().load_draft("q3");
    println!("   Draft in 'q3':   {:?}\n", app.chat().draft());

    // 5. Theme preview
    println!("5. Previewing themes...");
    let presented = app.theme().subscribe();
    app.theme_mut().start_preview(Theme::Midnight);
    if let ThemeMode::Previewing(preview) = app.theme().state().mode() {
        println!("   Previewing {} (presented: {})", preview, *presented.borrow());
    }
    app.theme_mut().stop_preview();
    println!("   Back to {}", *presented.borrow());
    app.theme_mut().set_theme(Theme::Verdant);
    app.theme_mut()
        .set_custom_settings(CustomSettingsPatch::new().font_size(FontSize::Large));
    println!("   ✓ Saved theme {}\n", app.theme().current_theme());

    // 6. Favorites and recents
    println!("6. Updating favorites...");
    preferences.toggle_favorite("code-review")?;
    preferences.touch_last_used("code-review", Utc::now())?;
    preferences.set_view_mode(ViewMode::List)?;
    println!("   Favorites: {:?}", preferences.favorites()?);
    println!("   Recently used: {:?}", preferences.recently_used(5)?);
    println!("   View mode: {}\n", preferences.view_mode()?.as_str());

    println!("Done. Run again to see the theme and draft restored from disk.");
    Ok(())
}
