use chessdotcom_export::{ChessComClient, ClientConfig, Error, Game};
use httpmock::prelude::*;
use serde_json::{json, Value};

fn client_for(server: &MockServer) -> ChessComClient {
    let config = ClientConfig::default().base_url(server.url("/pub/"));
    ChessComClient::with_config(config).unwrap()
}

fn game(id: u32, white_result: &str, black_result: &str) -> Value {
    json!({
        "url": format!("https://www.chess.com/game/live/{}", id),
        "pgn": "[Event \"Live Chess\"]\n[Result \"1-0\"]\n\n1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0\n",
        "time_control": "300",
        "time_class": "blitz",
        "rules": "chess",
        "rated": true,
        "end_time": 1700000000 + id as u64,
        "white": { "username": "magnus", "rating": 2850, "result": white_result },
        "black": { "username": "hikaru", "rating": 2830, "result": black_result }
    })
}

#[test]
fn test_lists_archives_with_one_request() {
    let server = MockServer::start();
    let archives = vec![
        server.url("/pub/player/magnus/games/2023/11"),
        server.url("/pub/player/magnus/games/2023/12"),
    ];

    let archives_mock = server.mock(|when, then| {
        when.method(GET).path("/pub/player/magnus/games/archives");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({ "archives": archives }));
    });

    let client = client_for(&server);
    let result = client.get_player_game_archives("magnus").unwrap();

    archives_mock.assert_hits(1);
    assert_eq!(result, archives);
}

#[test]
fn test_unknown_player_is_missing_field() {
    let server = MockServer::start();
    let archives_mock = server.mock(|when, then| {
        when.method(GET).path("/pub/player/nobody/games/archives");
        then.status(404)
            .json_body(json!({ "code": 0, "message": "User \"nobody\" not found." }));
    });

    let client = client_for(&server);
    let err = client.get_player_game_archives("nobody").unwrap_err();

    archives_mock.assert_hits(1);
    match err {
        Error::MissingField { key, object } => {
            assert_eq!(key, "archives");
            assert!(object.contains("not found"));
        }
        other => panic!("expected missing field error, got {:?}", other),
    }
}

#[test]
fn test_streams_games_from_every_archive() {
    let server = MockServer::start();
    let november = server.url("/pub/player/magnus/games/2023/11");
    let december = server.url("/pub/player/magnus/games/2023/12");

    server.mock(|when, then| {
        when.method(GET).path("/pub/player/magnus/games/archives");
        then.status(200).json_body(json!({ "archives": [november, december] }));
    });
    let november_mock = server.mock(|when, then| {
        when.method(GET).path("/pub/player/magnus/games/2023/11");
        then.status(200)
            .json_body(json!({ "games": [game(1, "win", "checkmated"), game(2, "agreed", "agreed")] }));
    });
    let december_mock = server.mock(|when, then| {
        when.method(GET).path("/pub/player/magnus/games/2023/12");
        then.status(200)
            .json_body(json!({ "games": [game(3, "resigned", "win")] }));
    });

    let client = client_for(&server);
    let games: Vec<Game> = client
        .get_player_games("magnus")
        .collect::<Result<_, _>>()
        .unwrap();

    november_mock.assert_hits(1);
    december_mock.assert_hits(1);

    let results: Vec<&str> = games.iter().map(Game::result).collect();
    assert_eq!(results, vec!["1-0", "1/2-1/2", "0-1"]);
    assert_eq!(games[0].moves().unwrap().len(), 7);
}

#[test]
fn test_stopping_early_leaves_later_archives_untouched() {
    let server = MockServer::start();
    let november = server.url("/pub/player/magnus/games/2023/11");
    let december = server.url("/pub/player/magnus/games/2023/12");

    server.mock(|when, then| {
        when.method(GET).path("/pub/player/magnus/games/archives");
        then.status(200).json_body(json!({ "archives": [november, december] }));
    });
    let november_mock = server.mock(|when, then| {
        when.method(GET).path("/pub/player/magnus/games/2023/11");
        then.status(200)
            .json_body(json!({ "games": [game(1, "win", "resigned"), game(2, "win", "timeout")] }));
    });
    let december_mock = server.mock(|when, then| {
        when.method(GET).path("/pub/player/magnus/games/2023/12");
        then.status(200).json_body(json!({ "games": [game(3, "win", "resigned")] }));
    });

    let client = client_for(&server);
    let first: Vec<Game> = client
        .get_player_games("magnus")
        .take(2)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(first.len(), 2);
    november_mock.assert_hits(1);
    december_mock.assert_hits(0);
}

#[test]
fn test_error_status_with_json_body_is_returned() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/pub/player/magnus/games/2023/11");
        then.status(410).json_body(json!({ "games": [] }));
    });

    let client = client_for(&server);
    let body = client
        .request(&server.url("/pub/player/magnus/games/2023/11"))
        .unwrap();

    mock.assert_hits(1);
    assert_eq!(body, json!({ "games": [] }));
}

#[test]
fn test_error_status_with_html_body_fails_to_decode() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/pub/player/magnus/games/archives");
        then.status(503).body("<html><body>Service Unavailable</body></html>");
    });

    let client = client_for(&server);
    let err = client.get_player_game_archives("magnus").unwrap_err();

    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn test_sends_user_agent() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/pub/player/magnus/games/archives")
            .header("user-agent", "export-test/1.0");
        then.status(200).json_body(json!({ "archives": [] }));
    });

    let config = ClientConfig::default()
        .base_url(server.url("/pub/"))
        .user_agent("export-test/1.0");
    let client = ChessComClient::with_config(config).unwrap();

    assert!(client.get_player_game_archives("magnus").unwrap().is_empty());
    mock.assert_hits(1);
}
