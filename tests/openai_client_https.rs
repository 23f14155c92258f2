use xpost::ai::client::openai::{Model, OpenAIClient, OpenAIRequest};
use xpost::ai::client::{APIClient, APIRequest, APIResponse};
use xpost::conf::OpenAIConfig;
use xpost::http::HTTPClientFactory;
use xpost::translate::{OpenAITranslator, Translator};

// These tests aren't particularly interesting and mostly serve to ensure
// that we can actually connect to the OpenAI service. They need a real
// $OPENAI_API_KEY, so run them with `--ignored`.

#[tokio::test]
#[ignore]
async fn it_sends_a_request() {
    let config = OpenAIConfig::from_env().expect("Is $OPENAI_API_KEY set?");
    let (client, _) = config
        .into_client(HTTPClientFactory::DEFAULT_TIMEOUT)
        .expect("could not create client");
    let req = OpenAIRequest::default()
        .model(Model::cheapest())
        .input("write a haiku about ai");
    let resp = client.send(&req).await;
    let resp = resp.expect("could not make OpenAI API request");
    assert_eq!(resp.output().count(), 1);
    assert!(!resp.output_text().is_empty());
}

#[tokio::test]
#[ignore]
async fn it_translates_a_sentence() {
    let auth = xpost::ai::Auth::from_env("OPENAI_API_KEY").expect("Is $OPENAI_API_KEY set?");
    let client = OpenAIClient::new(auth, &HTTPClientFactory::default()).unwrap();
    let translator = OpenAITranslator::new(client, "French").model(Model::cheapest());
    let translated = translator.translate("Good morning").await.unwrap();
    assert!(translated.to_lowercase().contains("bonjour"), "{translated}");
}
