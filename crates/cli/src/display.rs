//! Terminal rendering of cards, favorites and notices.

use colored::Colorize;
use server::render::{self, CARD_GENRES, FAVORITE_GENRES};
use server::{Favorites, MovieRecommendation, Notice, NoticeLevel};

pub fn print_recommendations(title: &str, recommendations: &[MovieRecommendation], full: bool) {
    if recommendations.is_empty() {
        return;
    }
    println!(
        "{}",
        format!("Movies similar to '{}':", title).bold().blue()
    );
    for rec in recommendations {
        println!(
            "{}. {} - similarity {:.3}",
            rec.rank.to_string().green(),
            render::heading(&rec.details).bold(),
            rec.score
        );
        for line in render::card_lines(&rec.details, CARD_GENRES, full) {
            println!("   {}", line);
        }
    }
}

pub fn print_favorites(favorites: &Favorites) {
    if favorites.is_empty() {
        println!("{}", "No favorites yet.".dimmed());
        return;
    }
    println!("{}", format!("Favorites ({}):", favorites.len()).bold().blue());
    for favorite in favorites.iter() {
        println!(
            "{} [{}] {}",
            "•".green(),
            favorite.key(),
            render::heading(favorite).bold()
        );
        for line in render::card_lines(favorite, FAVORITE_GENRES, true) {
            println!("   {}", line);
        }
    }
}

pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("{} {}", "✓".green(), notice.message),
        NoticeLevel::Info => println!("{} {}", "i".cyan(), notice.message),
        NoticeLevel::Warning => println!("{} {}", "!".yellow(), notice.message.yellow()),
    }
}
