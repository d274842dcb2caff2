//! The fifteen-step driver. Each step builds a request from the constants
//! below plus whatever ids earlier steps produced, makes one remote call, and
//! prints a human-readable summary. Failures are printed and swallowed at the
//! step boundary so the remaining steps always run; a step whose prerequisite
//! id is missing is skipped with a warning instead of attempted.

use std::collections::HashMap;

use chrono::Utc;
use secrecy::Secret;

use crate::client::Address;
use crate::client::ClientError;
use crate::client::CreateDomainRequest;
use crate::client::CreateIpPoolRequest;
use crate::client::CreateSubAccountRequest;
use crate::client::CreateWebhookRequest;
use crate::client::EmailMessage;
use crate::client::EspClient;
use crate::client::PoolIp;
use crate::client::Recipient;
use crate::client::RoutingStrategy;
use crate::client::StatCounts;
use crate::client::StatWindow;
use crate::client::SubAccount;
use crate::domain::DisplayName;
use crate::domain::EmailAddress;

// Example values; replace with addresses on a domain you have verified.
pub const FROM_EMAIL: &str = "sender@yourdomain.com";
pub const TO_EMAIL: &str = "recipient@example.com";
pub const SENDING_DOMAIN: &str = "yourdomain.com";
pub const WEBHOOK_URL: &str = "https://your-webhook-endpoint.com/webhook";

/// Window width for the three statistics steps
const STAT_DAYS: i64 = 7;

/// Print status code + body for a structured remote rejection, the cause
/// chain for anything else. Never propagates.
fn report_step_failure(
    action: &str,
    error: &anyhow::Error,
) {
    match error.downcast_ref::<ClientError>() {
        Some(ClientError::Api { status, body }) => {
            println!("✗ Failed to {action}:");
            println!("  Status code: {status}");
            println!("  Response body: {body}");
        }
        _ => {
            println!("✗ Unexpected error while trying to {action}:");
            println!("  {error:?}");
        }
    }
    tracing::error!(error.cause_chain = ?error, "failed to {action}");
}

/// Holds the client and the handful of ids that flow between steps. Written
/// by at most one step at a time, read by later ones; there is deliberately
/// no other state machine here.
pub struct WorkflowRunner {
    client: EspClient,
    sub_account_id: Option<i64>,
    webhook_id: Option<i64>,
    domain_id: Option<i64>,
    ip_pool_id: Option<i64>,
    message_id: Option<String>,
}

impl WorkflowRunner {
    pub fn new(client: EspClient) -> Self {
        Self {
            client,
            sub_account_id: None,
            webhook_id: None,
            domain_id: None,
            ip_pool_id: None,
            message_id: None,
        }
    }

    pub fn sub_account_id(&self) -> Option<i64> { self.sub_account_id }

    pub fn webhook_id(&self) -> Option<i64> { self.webhook_id }

    pub fn domain_id(&self) -> Option<i64> { self.domain_id }

    pub fn ip_pool_id(&self) -> Option<i64> { self.ip_pool_id }

    pub fn message_id(&self) -> Option<&str> { self.message_id.as_deref() }

    /// Remember the sub-account and sign all later sub-account-scoped calls
    /// with its key
    fn adopt_sub_account(
        &mut self,
        sub_account: &SubAccount,
    ) {
        self.sub_account_id = Some(sub_account.id);
        self.client
            .set_sub_account_key(Secret::new(sub_account.api_key.clone()));
    }

    /// Run all fifteen steps, in order, unconditionally
    pub async fn run(&mut self) {
        println!("================================================================");
        println!("  ESP workflow: sub-accounts, webhooks, domains, email sending,");
        println!("  message lookup, statistics, IPs and IP pools");
        println!("================================================================");

        self.list_sub_accounts().await;
        self.create_sub_account().await;
        self.create_webhook().await;
        self.list_webhooks().await;
        self.add_domain().await;
        self.list_domains().await;
        self.send_transactional_email().await;
        self.send_marketing_email().await;
        self.get_message_details().await;
        self.get_sub_account_stats().await;
        self.get_aggregate_stats().await;
        self.list_ips().await;
        self.create_ip_pool().await;
        self.list_ip_pools().await;
        self.get_account_stats().await;

        println!("\n================================================================");
        println!("  Workflow complete");
        println!("================================================================");
    }

    pub async fn list_sub_accounts(&mut self) {
        println!("\n=== Step 1: Listing All Sub-Accounts ===");
        if let Err(e) = self.try_list_sub_accounts().await {
            report_step_failure("list sub-accounts", &e);
        }
    }

    async fn try_list_sub_accounts(&mut self) -> Result<(), anyhow::Error> {
        println!("Retrieving all sub-accounts...");
        let sub_accounts = self.client.list_sub_accounts().await?;

        println!("✓ Retrieved {} sub-account(s)", sub_accounts.len());
        for sub_account in &sub_accounts {
            println!("  - ID: {}", sub_account.id);
            println!("    Name: {}", sub_account.name);
            println!("    API Key: {}", sub_account.api_key);
            println!("    Type: {}", sub_account.account_type());
            println!(
                "    Blocked: {}",
                if sub_account.blocked { "Yes" } else { "No" }
            );
            if let Some(created) = sub_account.created {
                println!("    Created: {created}");
            }
            println!();
        }

        // use the first listed sub-account if none is selected yet; kept
        // as-is rather than endorsed
        if self.sub_account_id.is_none() {
            if let Some(first) = sub_accounts.first() {
                self.adopt_sub_account(first);
            }
        }
        Ok(())
    }

    pub async fn create_sub_account(&mut self) {
        println!("\n=== Step 2: Creating Sub-Account ===");
        if let Err(e) = self.try_create_sub_account().await {
            report_step_failure("create sub-account", &e);
        }
    }

    async fn try_create_sub_account(&mut self) -> Result<(), anyhow::Error> {
        let body = CreateSubAccountRequest {
            // timestamped so reruns don't collide on the service's uniqueness
            // constraint
            name: format!("ESP Client - {}", Utc::now().timestamp()),
        };
        println!("Creating sub-account: {}", body.name);

        let sub_account = self.client.create_sub_account(&body).await?;
        self.adopt_sub_account(&sub_account);

        println!("✓ Sub-account created successfully!");
        println!("  ID: {}", sub_account.id);
        println!("  Name: {}", sub_account.name);
        println!("  API Key: {}", sub_account.api_key);
        println!("  Type: {}", sub_account.account_type());
        Ok(())
    }

    pub async fn create_webhook(&mut self) {
        println!("\n=== Step 3: Creating Webhook ===");
        if let Err(e) = self.try_create_webhook().await {
            report_step_failure("create webhook", &e);
        }
    }

    async fn try_create_webhook(&mut self) -> Result<(), anyhow::Error> {
        let body = CreateWebhookRequest::all_events(WEBHOOK_URL.to_string());
        println!("Creating webhook...");
        println!("  URL: {}", body.url);

        let webhook = self.client.create_webhook(&body).await?;
        self.webhook_id = Some(webhook.id);

        println!("✓ Webhook created successfully!");
        println!("  ID: {}", webhook.id);
        println!("  URL: {}", webhook.url);
        println!("  Enabled: {}", webhook.enabled);
        Ok(())
    }

    pub async fn list_webhooks(&mut self) {
        println!("\n=== Step 4: Listing All Webhooks ===");
        if let Err(e) = self.try_list_webhooks().await {
            report_step_failure("list webhooks", &e);
        }
    }

    async fn try_list_webhooks(&mut self) -> Result<(), anyhow::Error> {
        println!("Retrieving all webhooks...");
        let webhooks = self.client.list_webhooks().await?;

        println!("✓ Retrieved {} webhook(s)", webhooks.len());
        for webhook in &webhooks {
            println!("  - ID: {}", webhook.id);
            println!("    URL: {}", webhook.url);
            println!("    Enabled: {}", webhook.enabled);
            println!();
        }
        Ok(())
    }

    pub async fn add_domain(&mut self) {
        println!("\n=== Step 5: Adding Domain ===");
        if let Err(e) = self.try_add_domain().await {
            report_step_failure("add domain", &e);
        }
    }

    async fn try_add_domain(&mut self) -> Result<(), anyhow::Error> {
        let body = CreateDomainRequest {
            name: SENDING_DOMAIN.to_string(),
        };
        println!("Adding domain: {SENDING_DOMAIN}");

        let domain = self.client.add_domain(&body).await?;
        self.domain_id = Some(domain.id);

        println!("✓ Domain added successfully!");
        println!("  ID: {}", domain.id);
        println!("  Domain: {}", domain.name);
        println!("  Verified: {}", if domain.verified { "Yes" } else { "No" });
        if let Some(dkim) = &domain.dkim {
            println!("  DKIM Record: {}", dkim.text_value);
        }
        println!("\n⚠ Add the DNS records shown above to your domain's DNS settings to verify the domain.");
        Ok(())
    }

    pub async fn list_domains(&mut self) {
        println!("\n=== Step 6: Listing All Domains ===");
        if let Err(e) = self.try_list_domains().await {
            report_step_failure("list domains", &e);
        }
    }

    async fn try_list_domains(&mut self) -> Result<(), anyhow::Error> {
        println!("Retrieving all domains...");
        let domains = self.client.list_domains().await?;

        println!("✓ Retrieved {} domain(s)", domains.len());
        for domain in &domains {
            println!("  - ID: {}", domain.id);
            println!("    Domain: {}", domain.name);
            println!("    Verified: {}", if domain.verified { "Yes" } else { "No" });
            println!();
        }
        Ok(())
    }

    pub async fn send_transactional_email(&mut self) {
        println!("\n=== Step 7: Sending Transactional Email ===");
        if let Err(e) = self.try_send_transactional_email().await {
            report_step_failure("send email", &e);
        }
    }

    async fn try_send_transactional_email(&mut self) -> Result<(), anyhow::Error> {
        let from = EmailAddress::parse(FROM_EMAIL.to_string()).map_err(|e| anyhow::anyhow!(e))?;
        let from_name = DisplayName::parse("Your Company".to_string())
            .map_err(|e| anyhow::anyhow!(e))?;
        let to = EmailAddress::parse(TO_EMAIL.to_string()).map_err(|e| anyhow::anyhow!(e))?;
        let to_name = DisplayName::parse("Customer".to_string()).map_err(|e| anyhow::anyhow!(e))?;

        let message = EmailMessage::new(
            Address::new(&from, &from_name),
            "Order Confirmation - Transactional Email".to_string(),
        )
        .with_recipient(Recipient::new(&to, &to_name).with_custom_fields(HashMap::from([
            ("customer_id".to_string(), "67890".to_string()),
            ("order_value".to_string(), "99.99".to_string()),
        ])))
        .with_bodies(
            "<h1>Thank you for your order!</h1><p>Your order has been confirmed and will be processed shortly.</p>"
                .to_string(),
            "Thank you for your order! Your order has been confirmed and will be processed shortly."
                .to_string(),
        )
        .with_tracking()
        .with_headers(HashMap::from([
            ("X-Order-ID".to_string(), "12345".to_string()),
            ("X-Email-Type".to_string(), "transactional".to_string()),
        ]));

        println!("Sending transactional email...");
        println!("  From: {FROM_EMAIL}");
        println!("  To: {TO_EMAIL}");
        println!("  Subject: {}", message.subject);

        let acks = self.client.send_email(&message).await?;

        // one acknowledgement per recipient; the first one becomes the id we
        // look up later
        if let Some(first) = acks.first() {
            self.message_id = Some(first.message_id.clone());
        }
        println!("✓ Transactional email sent successfully!");
        for ack in &acks {
            println!("  Message ID: {}", ack.message_id);
            if let Some(to) = &ack.to {
                println!("  To: {to}");
            }
        }
        Ok(())
    }

    pub async fn send_marketing_email(&mut self) {
        println!("\n=== Step 8: Sending Marketing Email ===");
        if let Err(e) = self.try_send_marketing_email().await {
            report_step_failure("send email", &e);
        }
    }

    async fn try_send_marketing_email(&mut self) -> Result<(), anyhow::Error> {
        let from = EmailAddress::parse(FROM_EMAIL.to_string()).map_err(|e| anyhow::anyhow!(e))?;
        let from_name = DisplayName::parse("Marketing Team".to_string())
            .map_err(|e| anyhow::anyhow!(e))?;
        let to = EmailAddress::parse(TO_EMAIL.to_string()).map_err(|e| anyhow::anyhow!(e))?;
        let to_name = DisplayName::parse("Customer 1".to_string()).map_err(|e| anyhow::anyhow!(e))?;

        let message = EmailMessage::new(
            Address::new(&from, &from_name),
            "Special Offer - 20% Off Everything!".to_string(),
        )
        .with_recipient(Recipient::new(&to, &to_name))
        .with_bodies(
            "<html><body><h1>Special Offer!</h1><p>Get 20% off on all products. Use code: <strong>SAVE20</strong></p><p><a href=\"https://example.com/shop\">Shop Now</a></p></body></html>"
                .to_string(),
            "Special Offer! Get 20% off on all products. Use code: SAVE20. Visit: https://example.com/shop"
                .to_string(),
        )
        .with_tracking()
        .with_groups(vec!["marketing".to_string(), "promotional".to_string()])
        .with_headers(HashMap::from([
            ("X-Email-Type".to_string(), "marketing".to_string()),
            ("X-Campaign-ID".to_string(), "campaign-001".to_string()),
        ]));

        println!("Sending marketing email...");
        println!("  From: {FROM_EMAIL}");
        println!("  To: {TO_EMAIL}");
        println!("  Subject: {}", message.subject);

        let acks = self.client.send_email(&message).await?;

        // keep the transactional message id if we already have one
        if self.message_id.is_none() {
            if let Some(first) = acks.first() {
                self.message_id = Some(first.message_id.clone());
            }
        }
        println!("✓ Marketing email sent successfully!");
        for ack in &acks {
            println!("  Message ID: {}", ack.message_id);
            if let Some(to) = &ack.to {
                println!("  To: {to}");
            }
        }
        Ok(())
    }

    pub async fn get_message_details(&mut self) {
        println!("\n=== Step 9: Retrieving Message Details ===");

        let Some(message_id) = self.message_id.clone() else {
            println!("✗ No message ID available. Please send an email first.");
            tracing::warn!("skipping message lookup, no send produced a message id");
            return;
        };

        if let Err(e) = self.try_get_message_details(&message_id).await {
            report_step_failure("get message", &e);
        }
    }

    async fn try_get_message_details(
        &mut self,
        message_id: &str,
    ) -> Result<(), anyhow::Error> {
        println!("Retrieving message with ID: {message_id}");
        let message = self.client.get_message(message_id).await?;

        println!("✓ Message retrieved successfully!");
        println!("  Message ID: {}", message.message_id);
        if let Some(account_id) = message.account_id {
            println!("  Account ID: {account_id}");
        }
        if let Some(sub_account_id) = message.sub_account_id {
            println!("  Sub-Account ID: {sub_account_id}");
        }
        if let Some(ip_id) = message.ip_id {
            println!("  IP ID: {ip_id}");
        }
        if let Some(public_ip) = &message.public_ip {
            println!("  Public IP: {public_ip}");
        }
        if let Some(local_ip) = &message.local_ip {
            println!("  Local IP: {local_ip}");
        }
        if let Some(email_type) = &message.email_type {
            println!("  Email Type: {email_type}");
        }
        if let Some(submitted_at) = message.submitted_at {
            println!("  Submitted At: {submitted_at}");
        }
        if let Some(from) = &message.from {
            println!("  From: {}", from.email);
        }
        if let Some(to) = &message.to {
            println!("  To: {}", to.email);
            println!("    Name: {}", to.name);
        }
        if let Some(subject) = &message.subject {
            println!("  Subject: {subject}");
        }
        if let Some(ip_pool) = &message.ip_pool {
            println!("  IP Pool: {ip_pool}");
        }
        if let Some(attempt) = message.attempt {
            println!("  Delivery Attempts: {attempt}");
        }
        Ok(())
    }

    pub async fn get_sub_account_stats(&mut self) {
        println!("\n=== Step 10: Getting Sub-Account Statistics ===");

        let Some(sub_account_id) = self.sub_account_id else {
            println!("✗ No sub-account ID available. Please create or list sub-accounts first.");
            tracing::warn!("skipping sub-account stats, no sub-account selected");
            return;
        };

        if let Err(e) = self.try_get_sub_account_stats(sub_account_id).await {
            report_step_failure("get stats", &e);
        }
    }

    async fn try_get_sub_account_stats(
        &mut self,
        sub_account_id: i64,
    ) -> Result<(), anyhow::Error> {
        let window = StatWindow::last_days(STAT_DAYS);
        println!("Retrieving stats for sub-account ID: {sub_account_id}");
        println!("  From: {}", window.from);
        println!("  To: {}", window.to);

        let days = self.client.sub_account_stats(sub_account_id, window).await?;

        println!("✓ Stats retrieved successfully!");
        println!("  Retrieved {} stat record(s)", days.len());

        let mut total_processed = 0;
        let mut total_delivered = 0;
        for day in &days {
            println!("\n  Date: {}", day.date);
            if let Some(stats) = &day.stats {
                print_stat_counts(stats);
                total_processed += stats.processed;
                total_delivered += stats.delivered;
            }
        }

        println!("\n  Summary (Last {STAT_DAYS} days):");
        println!("    Total Processed: {total_processed}");
        println!("    Total Delivered: {total_delivered}");
        Ok(())
    }

    pub async fn get_aggregate_stats(&mut self) {
        println!("\n=== Step 11: Getting Aggregate Statistics ===");

        let Some(sub_account_id) = self.sub_account_id else {
            println!("✗ No sub-account ID available. Please create or list sub-accounts first.");
            tracing::warn!("skipping aggregate stats, no sub-account selected");
            return;
        };

        if let Err(e) = self.try_get_aggregate_stats(sub_account_id).await {
            report_step_failure("get aggregate stats", &e);
        }
    }

    async fn try_get_aggregate_stats(
        &mut self,
        sub_account_id: i64,
    ) -> Result<(), anyhow::Error> {
        let window = StatWindow::last_days(STAT_DAYS);
        println!("Retrieving aggregate stats for sub-account ID: {sub_account_id}");
        println!("  From: {}", window.from);
        println!("  To: {}", window.to);

        let stats = self
            .client
            .sub_account_aggregate_stats(sub_account_id, window)
            .await?;

        println!("✓ Aggregate stats retrieved successfully!");
        print_stat_counts(&stats);
        Ok(())
    }

    pub async fn list_ips(&mut self) {
        println!("\n=== Step 12: Listing All IPs ===");
        if let Err(e) = self.try_list_ips().await {
            report_step_failure("list IPs", &e);
        }
    }

    async fn try_list_ips(&mut self) -> Result<(), anyhow::Error> {
        println!("Retrieving all IPs...");
        let ips = self.client.list_ips().await?;

        println!("✓ Retrieved {} IP(s)", ips.len());
        for ip in &ips {
            println!("  - ID: {}", ip.id);
            println!("    IP Address: {}", ip.public_ip);
            if let Some(reverse_dns) = &ip.reverse_dns_hostname {
                println!("    Reverse DNS: {reverse_dns}");
            }
            if let Some(created) = ip.created {
                println!("    Created: {created}");
            }
            println!();
        }
        Ok(())
    }

    pub async fn create_ip_pool(&mut self) {
        println!("\n=== Step 13: Creating IP Pool ===");
        if let Err(e) = self.try_create_ip_pool().await {
            report_step_failure("create IP pool", &e);
        }
    }

    async fn try_create_ip_pool(&mut self) -> Result<(), anyhow::Error> {
        // membership is declared by address, so the available IPs have to be
        // fetched first
        let ips = self.client.list_ips().await?;

        let Some(first) = ips.first() else {
            println!("⚠ No IPs available. Please allocate IPs first.");
            tracing::warn!("skipping ip pool creation, account has no ips");
            return Ok(());
        };

        let body = CreateIpPoolRequest {
            name: format!("Marketing Pool - {}", Utc::now().timestamp()),
            routing_strategy: RoutingStrategy::RoundRobin,
            ips: vec![PoolIp {
                public_ip: first.public_ip.clone(),
            }],
        };
        println!("Creating IP pool: {}", body.name);
        println!("  Routing Strategy: {}", body.routing_strategy);
        println!("  IPs: {}", body.ips.len());

        let pool = self.client.create_ip_pool(&body).await?;
        self.ip_pool_id = Some(pool.id);

        println!("✓ IP pool created successfully!");
        println!("  ID: {}", pool.id);
        println!("  Name: {}", pool.name);
        println!("  Routing Strategy: {}", pool.routing_strategy);
        println!("  IPs in pool: {}", pool.ips.len());
        Ok(())
    }

    pub async fn list_ip_pools(&mut self) {
        println!("\n=== Step 14: Listing All IP Pools ===");
        if let Err(e) = self.try_list_ip_pools().await {
            report_step_failure("list IP pools", &e);
        }
    }

    async fn try_list_ip_pools(&mut self) -> Result<(), anyhow::Error> {
        println!("Retrieving all IP pools...");
        let pools = self.client.list_ip_pools().await?;

        println!("✓ Retrieved {} IP pool(s)", pools.len());
        for pool in &pools {
            println!("  - ID: {}", pool.id);
            println!("    Name: {}", pool.name);
            println!("    Routing Strategy: {}", pool.routing_strategy);
            println!("    IPs in pool: {}", pool.ips.len());
            for ip in &pool.ips {
                println!("      - {}", ip.public_ip);
            }
            println!();
        }
        Ok(())
    }

    pub async fn get_account_stats(&mut self) {
        println!("\n=== Step 15: Getting Account-Level Statistics ===");
        if let Err(e) = self.try_get_account_stats().await {
            report_step_failure("get account stats", &e);
        }
    }

    async fn try_get_account_stats(&mut self) -> Result<(), anyhow::Error> {
        let window = StatWindow::last_days(STAT_DAYS);
        println!("Retrieving account-level stats...");
        println!("  From: {}", window.from);
        println!("  To: {}", window.to);

        let days = self.client.account_stats(window).await?;

        println!("✓ Account stats retrieved successfully!");
        println!("  Retrieved {} stat record(s)", days.len());
        for day in &days {
            println!("\n  Date: {}", day.date);
            if let Some(stats) = &day.stats {
                print_stat_counts(stats);
            }
        }
        Ok(())
    }
}

fn print_stat_counts(stats: &StatCounts) {
    println!("    Processed: {}", stats.processed);
    println!("    Delivered: {}", stats.delivered);
    println!("    Dropped: {}", stats.dropped);
    println!("    Hard Bounced: {}", stats.hard_bounced);
    println!("    Soft Bounced: {}", stats.soft_bounced);
    println!("    Opened: {}", stats.opened);
    println!("    Clicked: {}", stats.clicked);
    println!("    Unsubscribed: {}", stats.unsubscribed);
    println!("    Spam: {}", stats.spam);
}
