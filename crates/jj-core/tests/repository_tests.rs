// A typical consumer: a model struct built from an API document, with
// required fields failing loudly and optional ones falling back.
use chrono::{DateTime, Utc};
use jj_core::{
    KeyedArchiver, KeyedUnarchiver, Node, Result, wrap, wrap_decoder, wrap_encoder,
};
use url::Url;

#[derive(Debug)]
struct Repository {
    name: String,
    description: String,
    stargazers_count: i64,
    language: Option<String>,
    sometimes_missing_key: Option<String>,
    owner: User,
    created_at: DateTime<Utc>,
    default_branch: String,
}

#[derive(Debug, PartialEq)]
struct User {
    id: i64,
    login: String,
    url: Url,
    site_admin: bool,
}

impl Repository {
    fn from_node(node: &Node) -> Result<Self> {
        let obj = wrap(node).obj()?;
        let owner = obj.at("owner").obj()?;
        Ok(Repository {
            name: obj.at("name").string()?,
            description: obj.at("description").string()?,
            stargazers_count: obj.at("stargazers_count").to_int(0),
            language: obj.at("language").as_string(),
            sometimes_missing_key: obj.at("sometimes_missing_key").as_string(),
            owner: User {
                id: owner.at("id").int()?,
                login: owner.at("login").string()?,
                url: owner.at("url").url()?,
                site_admin: owner.at("site_admin").to_bool(false),
            },
            created_at: obj.at("created_at").date()?,
            default_branch: obj.at("default_branch").to_string("master"),
        })
    }

    fn full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }
}

fn document() -> Node {
    Node::parse_json(
        r#"{
            "name": "JJ",
            "description": "Super simple json parser",
            "stargazers_count": 5,
            "language": "Swift",
            "sometimes_missing_key": null,
            "created_at": "2016-06-10T07:55:03.000Z",
            "owner": {
                "id": 1,
                "login": "anjlab",
                "url": "https://api.github.com/users/anjlab",
                "site_admin": false
            }
        }"#,
    )
    .unwrap()
}

#[test]
fn builds_model_from_document() {
    let repo = Repository::from_node(&document()).unwrap();
    assert_eq!(repo.full_name(), "anjlab/JJ");
    assert_eq!(repo.description, "Super simple json parser");
    assert_eq!(repo.stargazers_count, 5);
    assert_eq!(repo.language.as_deref(), Some("Swift"));
    assert_eq!(repo.sometimes_missing_key, None);
    assert_eq!(repo.default_branch, "master");
    assert_eq!(repo.owner.id, 1);
    assert!(!repo.owner.site_admin);
    assert_eq!(repo.owner.url.host_str(), Some("api.github.com"));
    assert_eq!(
        jj_core::to_rfc3339_string(&repo.created_at),
        "2016-06-10T07:55:03.000Z"
    );
}

#[test]
fn missing_required_field_names_its_path() {
    let doc = Node::parse_json(r#"{"name": "JJ", "description": "x"}"#).unwrap();
    let err = Repository::from_node(&doc).unwrap_err();
    assert_eq!(
        err.to_string(),
        "WrongType: Can't convert nil at path: '<root>.owner' to type '[String: Any]'"
    );

    let doc = Node::parse_json(
        r#"{"name": "JJ", "description": "x", "owner": {"id": "1"}}"#,
    )
    .unwrap();
    let err = Repository::from_node(&doc).unwrap_err();
    assert_eq!(err.path(), "<root>.owner.id");
    assert_eq!(
        err.to_string(),
        "WrongType: Can't convert \"1\" at path: '<root>.owner.id' to type 'Int'"
    );
}

#[test]
fn model_survives_an_archive_round_trip() {
    let repo = Repository::from_node(&document()).unwrap();

    let mut archiver = KeyedArchiver::new();
    {
        let mut enc = wrap_encoder(&mut archiver);
        enc.put(&repo.name, "name");
        enc.put(repo.stargazers_count, "stars");
        enc.put(&repo.language, "language");
        enc.put(&repo.sometimes_missing_key, "sometimesMissingKey");
        enc.put(repo.created_at, "createdAt");
        enc.put(&repo.owner.url, "ownerUrl");
    }
    let archive = KeyedUnarchiver::from_bytes(&archiver.finish()).unwrap();
    let dec = wrap_decoder(&archive);

    assert_eq!(dec.key("name").string().unwrap(), repo.name);
    assert_eq!(dec.key("stars").int().unwrap(), repo.stargazers_count);
    assert_eq!(dec.key("language").as_string(), repo.language);
    assert_eq!(dec.key("sometimesMissingKey").as_string(), None);
    assert_eq!(dec.key("createdAt").date().unwrap(), repo.created_at);
    assert_eq!(dec.key("ownerUrl").url().unwrap(), repo.owner.url);
}
