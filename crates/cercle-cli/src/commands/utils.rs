use cercle_application::FeedState;
use cercle_core::feed::Post;

pub fn print_post(post: &Post) {
    let verified = if post.author.is_verified { " ✓" } else { "" };
    let liked = if post.is_liked_by_current_user {
        "♥"
    } else {
        "♡"
    };
    println!(
        "#{} {}{} · {} {} · {} replies",
        post.id, post.author.display_name, verified, liked, post.like_count, post.reply_count
    );
    println!("    {}", post.content);
}

pub fn print_feed(state: &FeedState) {
    if state.posts.is_empty() {
        println!("(no posts)");
    }
    for post in &state.posts {
        print_post(post);
    }
    let pagination = &state.pagination;
    println!(
        "-- {} · page {} · {} total{}",
        state.filter,
        pagination.page,
        pagination.total,
        if pagination.has_next {
            " · more available"
        } else {
            ""
        }
    );
}
