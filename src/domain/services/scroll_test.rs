use super::Scroll;

#[test]
fn it_follows_new_content_by_default() {
    let mut scroll = Scroll::default();
    scroll.clamp(5);
    assert_eq!(scroll.position, 5);

    scroll.clamp(9);
    assert_eq!(scroll.position, 9);
    assert!(scroll.follow);
}

#[test]
fn it_stops_following_when_scrolled_up() {
    let mut scroll = Scroll::default();
    scroll.clamp(10);
    scroll.up(3);

    scroll.clamp(12);
    assert_eq!(scroll.position, 7);
    assert!(!scroll.follow);
}

#[test]
fn it_resumes_following_at_the_bottom() {
    let mut scroll = Scroll::default();
    scroll.clamp(10);
    scroll.up(2);

    scroll.down(2);
    scroll.clamp(10);
    assert_eq!(scroll.position, 10);
    assert!(scroll.follow);
}

#[test]
fn it_clamps_overshoot() {
    let mut scroll = Scroll::default();
    scroll.clamp(4);
    scroll.up(1);
    scroll.down(50);

    scroll.clamp(4);
    assert_eq!(scroll.position, 4);
}

#[test]
fn it_does_not_underflow_at_the_top() {
    let mut scroll = Scroll::default();
    scroll.clamp(3);
    scroll.up(100);
    assert_eq!(scroll.position, 0);

    scroll.top();
    assert_eq!(scroll.position, 0);
    assert!(!scroll.follow);
}
