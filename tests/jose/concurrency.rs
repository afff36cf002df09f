use std::collections::HashSet;
use std::sync::Arc;

use jwa::crypto::jose::{GenerateKeyOptions, KeyOperation};

use super::facade;

const TASKS: usize = 32;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_key_across_tasks() {
    let jwa = Arc::new(facade());
    let pair = jwa
        .generate_key(
            "ES256",
            &GenerateKeyOptions::for_key_ops([KeyOperation::Sign, KeyOperation::Verify]),
        )
        .await
        .unwrap()
        .into_pair()
        .unwrap();

    let handles: Vec<_> = (0..TASKS)
        .map(|i| {
            let jwa = jwa.clone();
            let pair = pair.clone();
            tokio::spawn(async move {
                let message = format!("message {i}");
                let signature = jwa.sign("ES256", &pair.private_key, &message).await.unwrap();
                jwa.verify("ES256", &pair.public_key, &signature, &message)
                    .await
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_encryptions_never_share_an_iv() {
    let jwa = Arc::new(facade());
    let key = jwa
        .generate_key(
            "A256GCM",
            &GenerateKeyOptions::for_key_ops([KeyOperation::Encrypt, KeyOperation::Decrypt]),
        )
        .await
        .unwrap()
        .into_secret()
        .unwrap();

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let jwa = jwa.clone();
            let key = key.clone();
            tokio::spawn(async move {
                let encrypted = jwa.encrypt("A256GCM", &key, "payload", None).await.unwrap();
                let plaintext = jwa
                    .decrypt_result("A256GCM", &key, &encrypted, None)
                    .await
                    .unwrap();
                assert_eq!(plaintext, "payload");
                encrypted.iv
            })
        })
        .collect();

    let mut ivs = HashSet::new();
    for handle in handles {
        assert!(ivs.insert(handle.await.unwrap()));
    }
    assert_eq!(ivs.len(), TASKS);
}
